//! # Counter Scenario Tests

use framebench_core::BenchError;
use framebench_core::config::CounterConfig;
use framebench_core::scenarios::counter;
use framebench_core::uart::FaultRng;
use rstest::rstest;

use crate::common::harness::bench;
use crate::common::models::CounterModel;

#[test]
fn default_run_passes() {
    let mut sim = bench(CounterModel::new());
    let mut rng = FaultRng::new(2024);
    let report = counter::run(&mut sim, &CounterConfig::default(), &mut rng).unwrap();
    assert_eq!(report.cycles, 256);
    assert_eq!(report.seed, 2024);
    assert!(report.clears <= 256);
}

#[rstest]
#[case(0.0, 0)]
#[case(1.0, 40)]
fn clear_probability_bounds(#[case] probability: f64, #[case] clears: u32) {
    let config = CounterConfig {
        cycles: 40,
        clear_probability: probability,
        ..CounterConfig::default()
    };
    let mut sim = bench(CounterModel::new());
    let report = counter::run(&mut sim, &config, &mut FaultRng::new(1)).unwrap();
    assert_eq!(report.clears, clears);
}

#[test]
fn a_disconnected_clear_is_caught() {
    let config = CounterConfig {
        cycles: 8,
        clear_probability: 1.0,
        ..CounterConfig::default()
    };
    let mut sim = bench(CounterModel::ignoring_clear());
    let err = counter::run(&mut sim, &config, &mut FaultRng::new(1)).unwrap_err();
    match err {
        BenchError::Mismatch {
            what,
            expected,
            actual,
        } => {
            assert_eq!(what, "io_value");
            assert_eq!(expected, 0);
            assert_eq!(actual, 2);
        }
        other => panic!("expected a value mismatch, got {other}"),
    }
}

#[test]
fn same_seed_same_clears() {
    let run = || {
        let mut sim = bench(CounterModel::new());
        counter::run(&mut sim, &CounterConfig::default(), &mut FaultRng::new(77)).unwrap()
    };
    assert_eq!(run(), run());
}
