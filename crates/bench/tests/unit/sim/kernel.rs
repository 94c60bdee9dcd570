//! # Kernel Tests
//!
//! Clock placement, wait-point semantics and failure modes of the simulator.

use framebench_core::BenchError;
use framebench_core::common::{Edge, SimTime, TimeUnit};
use framebench_core::config::GeneralConfig;
use framebench_core::sim::Simulator;

use crate::common::harness::bench;
use crate::common::models::CounterModel;

#[test]
fn timer_advances_without_clocks() {
    let mut sim = bench(CounterModel::new());
    sim.timer(SimTime::from_ns(7));
    sim.timer_in(3, TimeUnit::Us);
    assert_eq!(sim.now(), SimTime::from_ps(3_007_000));
}

#[test]
fn edges_land_half_a_period_after_start() {
    let mut sim = bench(CounterModel::new());
    let clk = sim.id("clk").unwrap();
    sim.timer(SimTime::from_ns(2));
    sim.start_clock(clk, SimTime::from_ns(10)).unwrap();
    sim.rising_edge(clk).unwrap();
    assert_eq!(sim.now(), SimTime::from_ns(7));
    sim.falling_edge(clk).unwrap();
    assert_eq!(sim.now(), SimTime::from_ns(12));
    sim.clock_cycles(clk, 3).unwrap();
    assert_eq!(sim.now(), SimTime::from_ns(37));
}

#[test]
fn values_after_rising_edge_are_post_edge() {
    let mut sim = bench(CounterModel::new());
    let clk = sim.id("clk").unwrap();
    let value = sim.id("io_value").unwrap();
    sim.start_clock(clk, SimTime::from_ns(2)).unwrap();
    assert_eq!(sim.get(value), 0);
    sim.rising_edge(clk).unwrap();
    assert_eq!(sim.get(value), 1);
    sim.falling_edge(clk).unwrap();
    assert_eq!(sim.get(value), 1);
    sim.rising_edge(clk).unwrap();
    assert_eq!(sim.get(value), 2);
}

#[test]
fn writes_settle_before_the_next_wait_point() {
    let mut sim = bench(CounterModel::new());
    sim.write("reset", 1).unwrap();
    assert_eq!(sim.read("io_value").unwrap(), 0);
    assert_eq!(sim.read("io_full").unwrap(), 0);
}

#[test]
fn waiting_without_a_clock_stalls() {
    let mut sim = bench(CounterModel::new());
    let clk = sim.id("clk").unwrap();
    let err = sim.rising_edge(clk).unwrap_err();
    assert!(matches!(err, BenchError::Stalled { .. }), "{err}");
    assert!(err.is_hang());
}

#[test]
fn stopped_clock_no_longer_advances() {
    let mut sim = bench(CounterModel::new());
    let clk = sim.id("clk").unwrap();
    sim.start_clock(clk, SimTime::from_ns(4)).unwrap();
    sim.rising_edge(clk).unwrap();
    sim.stop_clock(clk);
    assert_eq!(sim.next_event(), None);
    assert!(sim.rising_edge(clk).is_err());
}

#[test]
fn latch_catches_single_cycle_pulses_inside_a_timer() {
    let mut sim = bench(CounterModel::new());
    let clk = sim.id("clk").unwrap();
    let full = sim.id("io_full").unwrap();
    let value = sim.id("io_value").unwrap();
    sim.start_clock(clk, SimTime::from_ns(10)).unwrap();
    sim.latch_rising(full, value);
    // Full is high for one cycle at 145 ns and again at 305 ns.
    sim.timer(SimTime::from_ns(400));
    assert!(!sim.level(full));
    assert_eq!(sim.release_latch(full), vec![15, 15]);
    assert!(sim.release_latch(full).is_empty());
}

#[test]
fn wait_until_times_out_after_exactly_its_budget() {
    let mut sim = bench(CounterModel::new());
    let clk = sim.id("clk").unwrap();
    let reset = sim.id("reset").unwrap();
    let full = sim.id("io_full").unwrap();
    sim.set_level(reset, true);
    sim.start_clock(clk, SimTime::from_ns(10)).unwrap();
    let start = sim.now();
    let err = sim
        .wait_until("counter full", SimTime::from_ns(100), |signals| {
            signals.level(full)
        })
        .unwrap_err();
    match err {
        BenchError::Timeout { waiting_for, after } => {
            assert_eq!(waiting_for, "counter full");
            assert_eq!(after, SimTime::from_ns(100));
        }
        other => panic!("expected a timeout, got {other}"),
    }
    assert_eq!(sim.now(), start + SimTime::from_ns(100));
    assert_eq!(sim.stats().timeouts, 1);
}

#[test]
fn wait_until_sees_the_condition_it_waits_for() {
    let mut sim = bench(CounterModel::new());
    let clk = sim.id("clk").unwrap();
    let full = sim.id("io_full").unwrap();
    sim.start_clock(clk, SimTime::from_ns(10)).unwrap();
    sim.wait_until("counter full", SimTime::from_us(1), |signals| {
        signals.level(full)
    })
    .unwrap();
    assert_eq!(sim.read("io_value").unwrap(), 15);
    assert_eq!(sim.now(), SimTime::from_ns(145));
}

#[test]
fn wait_for_level_returns_at_once_when_already_there() {
    let mut sim = bench(CounterModel::new());
    let value = sim.id("io_value").unwrap();
    sim.wait_for_level(value, 0, SimTime::from_ns(1)).unwrap();
    assert_eq!(sim.now(), SimTime::ZERO);
}

#[test]
fn wait_edge_ignores_levels_already_present() {
    let mut sim = bench(CounterModel::new());
    let clk = sim.id("clk").unwrap();
    let full = sim.id("io_full").unwrap();
    sim.start_clock(clk, SimTime::from_ns(10)).unwrap();
    sim.wait_for_rising(full, SimTime::from_us(1)).unwrap();
    let first = sim.now();
    sim.wait_edge(full, Edge::Rising, SimTime::from_us(1)).unwrap();
    assert_eq!(sim.now(), first + SimTime::from_ns(160));
}

#[test]
fn clocks_cannot_be_started_twice() {
    let mut sim = bench(CounterModel::new());
    sim.start_clock_named("clk", SimTime::from_ns(10)).unwrap();
    let err = sim.start_clock_named("clk", SimTime::from_ns(10)).unwrap_err();
    assert!(matches!(err, BenchError::ClockAlreadyRunning(ref name) if name == "clk"));
}

#[test]
fn unknown_signals_are_reported_by_name() {
    let sim = bench(CounterModel::new());
    let err = sim.id("io_missing").unwrap_err();
    assert_eq!(err.to_string(), "unknown signal 'io_missing'");
}

#[test]
fn watchdog_comes_from_general_config() {
    let general = GeneralConfig {
        watchdog_us: 1,
        seed: None,
    };
    let mut sim = Simulator::with_config(CounterModel::new(), &general).unwrap();
    assert_eq!(sim.watchdog(), SimTime::from_us(1));
    let clk = sim.id("clk").unwrap();
    let full = sim.id("io_full").unwrap();
    let reset = sim.id("reset").unwrap();
    sim.set_level(reset, true);
    sim.start_clock(clk, SimTime::from_ns(10)).unwrap();
    let err = sim.wait_for_rising(full, sim.watchdog()).unwrap_err();
    assert!(matches!(err, BenchError::Timeout { .. }));
}

#[test]
fn oversized_watchdog_saturates_instead_of_overflowing() {
    let general = GeneralConfig {
        watchdog_us: u64::MAX,
        seed: None,
    };
    let mut sim = Simulator::with_config(CounterModel::new(), &general).unwrap();
    assert_eq!(sim.watchdog(), SimTime::from_ps(u64::MAX));
    let clk = sim.id("clk").unwrap();
    let full = sim.id("io_full").unwrap();
    sim.start_clock(clk, SimTime::from_ns(10)).unwrap();
    sim.timer(SimTime::from_ns(1));
    sim.wait_for_rising(full, sim.watchdog()).unwrap();
    assert_eq!(sim.now(), SimTime::from_ns(145));
}
