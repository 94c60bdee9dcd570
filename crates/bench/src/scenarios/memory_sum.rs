//! Dual-clock memory summer.
//!
//! Fills the memory through its write port (data == address), pulses start in
//! the summing domain and polls for done on every summing-clock edge. The two
//! domains run on independent clocks; the summing domain has an asynchronous
//! reset.

use crate::common::logic::width_mask;
use crate::common::{BenchError, BenchResult, SimTime};
use crate::config::MemorySumConfig;
use crate::sim::{Dut, Simulator};

/// Write-port clock.
pub const WR_CLK: &str = "io_wr_clk";
/// Write address.
pub const WR_ADDR: &str = "io_wr_addr";
/// Write data.
pub const WR_DATA: &str = "io_wr_data";
/// Write enable.
pub const WR_EN: &str = "io_wr_en";
/// Summing-domain clock.
pub const SUM_CLK: &str = "io_sum_clk";
/// Start pulse.
pub const SUM_START: &str = "io_sum_start";
/// Completion flag.
pub const SUM_DONE: &str = "io_sum_done";
/// Accumulated sum.
pub const SUM_VALUE: &str = "io_sum_value";
/// Asynchronous reset of the summing domain.
pub const SUM_RESET: &str = "io_sum_reset";

/// Outcome of a summing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySumReport {
    /// Words written through the write port.
    pub words_written: u32,
    /// Sum reported by the device.
    pub sum: u64,
    /// Summing-clock cycles from start until done was seen.
    pub cycles_to_done: u32,
}

/// Sum the device must report after `depth` writes of `addr` to `addr`.
///
/// Data wider than the write port wraps to its width.
pub fn expected_sum(depth: u32, data_width: u8) -> u64 {
    let mask = width_mask(data_width);
    (0..u64::from(depth)).map(|addr| addr & mask).sum()
}

/// Writes the memory, runs the summer and checks its result.
pub fn run<D: Dut>(sim: &mut Simulator<D>, config: &MemorySumConfig) -> BenchResult<MemorySumReport> {
    let _span = tracing::info_span!("memory_sum", depth = config.depth).entered();
    let wr_clk = sim.id(WR_CLK)?;
    let wr_addr = sim.id(WR_ADDR)?;
    let wr_data = sim.id(WR_DATA)?;
    let wr_en = sim.id(WR_EN)?;
    let sum_clk = sim.id(SUM_CLK)?;
    let start = sim.id(SUM_START)?;
    let done = sim.id(SUM_DONE)?;
    let value = sim.id(SUM_VALUE)?;
    let reset = sim.id(SUM_RESET)?;

    sim.set_level(wr_en, false);
    sim.set_level(start, false);
    sim.start_clock(wr_clk, SimTime::from_ns(config.write_clock_ns))?;
    sim.start_clock(sum_clk, SimTime::from_ns(config.sum_clock_ns))?;
    sim.set_level(reset, true);
    sim.timer(SimTime::from_ns(config.reset_ns));
    sim.set_level(reset, false);
    tracing::info!(at = %sim.now(), "reset released");

    for addr in 0..u64::from(config.depth) {
        sim.falling_edge(wr_clk)?;
        sim.set(wr_addr, addr);
        sim.set(wr_data, addr);
        sim.set_level(wr_en, true);
        sim.rising_edge(wr_clk)?;
    }
    sim.falling_edge(wr_clk)?;
    sim.set_level(wr_en, false);
    tracing::debug!(words = config.depth, at = %sim.now(), "memory written");

    sim.rising_edge(sum_clk)?;
    sim.set_level(start, true);
    sim.rising_edge(sum_clk)?;
    sim.set_level(start, false);

    let mut cycles_to_done = 0;
    while !sim.level(done) {
        if cycles_to_done == config.done_timeout_cycles {
            return Err(BenchError::Timeout {
                waiting_for: SUM_DONE.to_owned(),
                after: SimTime::from_ns(config.sum_clock_ns).times(u64::from(cycles_to_done)),
            });
        }
        sim.rising_edge(sum_clk)?;
        cycles_to_done += 1;
    }

    let expected = expected_sum(config.depth, sim.signals().port(wr_data).width);
    let sum = sim.get(value);
    if sum != expected {
        return Err(BenchError::mismatch(SUM_VALUE, expected, sum));
    }
    tracing::info!(sum, cycles_to_done, "sum verified");

    sim.clock_cycles(sum_clk, config.tail_cycles)?;
    sim.stats().log("memory_sum");
    Ok(MemorySumReport {
        words_written: config.depth,
        sum,
        cycles_to_done,
    })
}
