//! Free-running clock generators.
//!
//! A generator owns exactly one signal and only ever toggles it. It never
//! touches data signals, so it cannot race with the stimulus procedure.

use super::signals::SignalId;
use crate::common::{BenchError, BenchResult, Edge, SimTime};

/// One periodic square wave.
#[derive(Debug, Clone)]
pub struct ClockGen {
    signal: SignalId,
    high: SimTime,
    low: SimTime,
    level: bool,
    next_toggle: SimTime,
    edges: u64,
}

impl ClockGen {
    /// Creates a generator that holds the clock low at `start` and rises half a
    /// period later.
    ///
    /// Odd picosecond periods give the extra picosecond to the low phase.
    pub fn new(signal: SignalId, period: SimTime, start: SimTime) -> BenchResult<Self> {
        if period.as_ps() < 2 {
            return Err(BenchError::InvalidConfig(format!(
                "clock period {period} is shorter than two kernel ticks"
            )));
        }
        let high = SimTime::from_ps(period.as_ps() / 2);
        let low = period - high;
        Ok(Self {
            signal,
            high,
            low,
            level: false,
            next_toggle: start + low,
            edges: 0,
        })
    }

    /// Signal driven by this generator.
    pub const fn signal(&self) -> SignalId {
        self.signal
    }

    /// Time of the next transition.
    pub const fn next_toggle(&self) -> SimTime {
        self.next_toggle
    }

    /// Full period.
    pub fn period(&self) -> SimTime {
        self.high + self.low
    }

    /// Level currently driven.
    pub const fn level(&self) -> bool {
        self.level
    }

    /// Transitions produced so far.
    pub const fn edges(&self) -> u64 {
        self.edges
    }

    /// Performs the pending transition and schedules the next one.
    pub fn toggle(&mut self) -> Edge {
        self.level = !self.level;
        self.edges += 1;
        if self.level {
            self.next_toggle += self.high;
            Edge::Rising
        } else {
            self.next_toggle += self.low;
            Edge::Falling
        }
    }
}
