//! Simulation statistics collection and reporting.
//!
//! This module tracks kernel activity for one scenario. It provides:
//! 1. **Time:** Simulated time reached and host time spent.
//! 2. **Kernel work:** Clock edges dispatched, settle passes, testbench writes.
//! 3. **Waits:** Wait points entered and how many of them timed out.

use std::fmt;
use std::time::Instant;

use crate::common::SimTime;

/// Kernel activity counters.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Simulated time reached.
    pub sim_time: SimTime,
    /// Clock transitions dispatched to the device (both edges).
    pub clock_edges: u64,
    /// Combinational settle passes run on the device.
    pub settles: u64,
    /// Signal writes performed by the testbench.
    pub signal_writes: u64,
    /// Wait points entered (edges, timers, conditions).
    pub wait_points: u64,
    /// Wait points that ended in a timeout or stall.
    pub timeouts: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            sim_time: SimTime::ZERO,
            clock_edges: 0,
            settles: 0,
            signal_writes: 0,
            wait_points: 0,
            timeouts: 0,
        }
    }
}

impl SimStats {
    /// Host wall-clock seconds since the kernel was created.
    pub fn host_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Emits the counters as one structured `info` event.
    pub fn log(&self, scenario: &str) {
        tracing::info!(
            scenario,
            sim_time = %self.sim_time,
            clock_edges = self.clock_edges,
            settles = self.settles,
            signal_writes = self.signal_writes,
            wait_points = self.wait_points,
            timeouts = self.timeouts,
            host_seconds = self.host_seconds(),
            "simulation statistics"
        );
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "TESTBENCH SIMULATION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "host_seconds             {:.4} s", self.host_seconds())?;
        writeln!(f, "sim_time                 {}", self.sim_time)?;
        writeln!(f, "clock_edges              {}", self.clock_edges)?;
        writeln!(f, "settles                  {}", self.settles)?;
        writeln!(f, "signal_writes            {}", self.signal_writes)?;
        writeln!(f, "wait_points              {}", self.wait_points)?;
        writeln!(f, "timeouts                 {}", self.timeouts)
    }
}
