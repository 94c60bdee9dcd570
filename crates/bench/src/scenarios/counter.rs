//! Free-running 4-bit counter with synchronous clear.
//!
//! The model expects 0, 1, ..., 15, 0, ... on successive rising edges, except
//! that a clear sampled on an edge forces the next value to 0. `io_full` must
//! be high exactly when the value is 15.

use crate::common::{BenchError, BenchResult, SimTime};
use crate::config::CounterConfig;
use crate::sim::{Dut, SignalId, Simulator};
use crate::uart::FaultRng;

/// Counter clock.
pub const CLK: &str = "clk";
/// Reset, active high.
pub const RESET: &str = "reset";
/// Synchronous clear.
pub const CLEAR: &str = "io_clear";
/// Counter value.
pub const VALUE: &str = "io_value";
/// Terminal-count flag.
pub const FULL: &str = "io_full";

/// Largest counter value.
const TOP: u64 = 15;

/// Outcome of a counter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterReport {
    /// Rising edges checked against the model.
    pub cycles: u32,
    /// Cycles on which clear was asserted.
    pub clears: u32,
    /// Seed of the clear generator.
    pub seed: u64,
}

#[derive(Clone, Copy)]
struct Pins {
    clk: SignalId,
    reset: SignalId,
    clear: SignalId,
    value: SignalId,
    full: SignalId,
}

/// Resets the counter, then checks `config.cycles` edges with random clears.
pub fn run<D: Dut>(
    sim: &mut Simulator<D>,
    config: &CounterConfig,
    rng: &mut FaultRng,
) -> BenchResult<CounterReport> {
    let _span = tracing::info_span!("counter", seed = rng.seed()).entered();
    let pins = Pins {
        clk: sim.id(CLK)?,
        reset: sim.id(RESET)?,
        clear: sim.id(CLEAR)?,
        value: sim.id(VALUE)?,
        full: sim.id(FULL)?,
    };

    let pulse = SimTime::from_ns(config.reset_ns);
    sim.set_level(pins.clear, false);
    sim.set_level(pins.reset, true);
    sim.timer(pulse);
    sim.set_level(pins.reset, false);
    sim.timer(pulse);
    sim.start_clock(pins.clk, SimTime::from_ps(config.clock_period_ps))?;
    tracing::info!(at = %sim.now(), "reset released");

    let mut expected = 0;
    check(sim, pins, expected)?;

    let mut clears = 0;
    let mut clear = false;
    for _ in 0..config.cycles {
        sim.rising_edge(pins.clk)?;
        expected = if clear { 0 } else { (expected + 1) & TOP };
        check(sim, pins, expected)?;

        clear = rng.chance(config.clear_probability);
        if clear {
            clears += 1;
            tracing::debug!(at = %sim.now(), "asserting clear");
        }
        sim.set_level(pins.clear, clear);
    }
    sim.set_level(pins.clear, false);

    let report = CounterReport {
        cycles: config.cycles,
        clears,
        seed: rng.seed(),
    };
    tracing::info!(cycles = report.cycles, clears = report.clears, "counter passed");
    sim.stats().log("counter");
    Ok(report)
}

fn check<D: Dut>(sim: &Simulator<D>, pins: Pins, expected: u64) -> BenchResult<()> {
    let value = sim.get(pins.value);
    if value != expected {
        return Err(BenchError::mismatch(VALUE, expected, value));
    }
    let full = sim.get(pins.full);
    let expected_full = u64::from(expected == TOP);
    if full != expected_full {
        return Err(BenchError::mismatch(FULL, expected_full, full));
    }
    Ok(())
}
