//! # UART Receive Scenario Tests

use framebench_core::BenchError;
use framebench_core::config::{Config, FrameConfig, UartConfig};
use framebench_core::scenarios::uart_rx;
use framebench_core::uart::{FaultLocation, FaultPlan, FaultRng, VerificationResult};
use pretty_assertions::assert_eq;

use crate::common::harness::bench;
use crate::common::models::UartRxModel;

#[test]
fn default_run_recovers_a_noisy_byte() {
    let config = Config::default();
    let mut sim = bench(UartRxModel::new(config.frame.samples_per_bit));
    let mut rng = FaultRng::new(0x5EED);
    let report = uart_rx::run(&mut sim, &config.frame, &config.uart, &mut rng).unwrap();
    assert_eq!(report.bytes_verified, 1);
    assert_eq!(report.faults_injected, 1);
    assert_eq!(report.seed, 0x5EED);
    assert_eq!(
        report.results,
        vec![VerificationResult {
            expected: 0x55,
            observed: 0x55,
            matched: true,
        }]
    );
}

#[test]
fn multi_byte_run_with_noise_anywhere() {
    let frame = FrameConfig::new(115_200, 8);
    let config = UartConfig {
        payloads: vec![0x00, 0xFF, 0x55, 0xAA, 0x3C, 0x81],
        fault: FaultPlan::RandomAny,
        idle_samples: 2,
        tail_us: 1,
        ..UartConfig::default()
    };
    let mut sim = bench(UartRxModel::new(8));
    let report = uart_rx::run(&mut sim, &frame, &config, &mut FaultRng::new(9)).unwrap();
    assert_eq!(report.bytes_verified, 6);
    assert_eq!(report.faults_injected, 6);
    let observed: Vec<u8> = report.results.iter().map(|result| result.observed).collect();
    assert_eq!(observed, config.payloads);
    assert_eq!(sim.dut().framing_errors(), 0);
}

#[test]
fn pulsed_valid_receiver_passes_the_scenario() {
    let frame = FrameConfig::new(115_200, 8);
    let config = UartConfig {
        payloads: vec![0x55, 0xA0],
        tail_us: 1,
        ..UartConfig::default()
    };
    let mut sim = bench(UartRxModel::pulsed(8));
    let report = uart_rx::run(&mut sim, &frame, &config, &mut FaultRng::new(77)).unwrap();
    assert_eq!(report.bytes_verified, 2);
    assert!(report.results.iter().all(|result| result.matched));
}

#[test]
fn clean_plan_injects_nothing() {
    let frame = FrameConfig::new(57_600, 4);
    let config = UartConfig {
        payloads: vec![0x12, 0x34],
        fault: FaultPlan::Clean,
        tail_us: 0,
        ..UartConfig::default()
    };
    let mut sim = bench(UartRxModel::new(4));
    let report = uart_rx::run(&mut sim, &frame, &config, &mut FaultRng::new(3)).unwrap();
    assert_eq!(report.bytes_verified, 2);
    assert_eq!(report.faults_injected, 0);
}

#[test]
fn one_sample_per_bit_cannot_outvote_noise() {
    let frame = FrameConfig::new(115_200, 1).with_noise(4, 0);
    let config = UartConfig {
        payloads: vec![0x00],
        fault: FaultPlan::Fixed,
        ..UartConfig::default()
    };
    let mut sim = bench(UartRxModel::new(1));
    let err = uart_rx::run(&mut sim, &frame, &config, &mut FaultRng::new(42)).unwrap_err();
    match err {
        BenchError::UartMismatch {
            expected,
            observed,
            fault,
            seed,
        } => {
            assert_eq!(expected, 0x00);
            assert_eq!(observed, 0x08);
            assert_eq!(fault, Some(FaultLocation { bit: 4, sample: 0 }));
            assert_eq!(seed, 42);
        }
        other => panic!("expected a byte mismatch, got {other}"),
    }
}

#[test]
fn a_receiver_that_never_answers_times_out() {
    let frame = FrameConfig::new(115_200, 1).with_noise(9, 0);
    let config = UartConfig {
        fault: FaultPlan::Fixed,
        valid_timeout_ns: 50_000,
        ..UartConfig::default()
    };
    let mut sim = bench(UartRxModel::new(1));
    let err = uart_rx::run(&mut sim, &frame, &config, &mut FaultRng::new(1)).unwrap_err();
    assert!(err.is_hang(), "{err}");
}

#[test]
fn receiver_clock_too_slow_for_the_sample_slot() {
    let frame = FrameConfig::new(115_200, 8);
    let config = UartConfig {
        clock_period_ns: 1_000,
        ..UartConfig::default()
    };
    let mut sim = bench(UartRxModel::new(8));
    let err = uart_rx::run(&mut sim, &frame, &config, &mut FaultRng::new(1)).unwrap_err();
    assert!(matches!(err, BenchError::InvalidConfig(_)));
}
