//! Testbench error taxonomy.
//!
//! Every failure a scenario can hit is a variant of [`BenchError`]. They fall in
//! three families:
//! 1. **Hangs:** an awaited signal never reached the expected state in time.
//! 2. **Mismatches:** a read-back, sum, or decoded byte differs from the model.
//! 3. **Protocol timing:** an output held the wrong level at a given timer value.
//!
//! The remaining variants cover kernel misuse and configuration loading. None of
//! them are retried: stimulus is deterministic for a given seed, so a retry would
//! reproduce the same outcome.

use thiserror::Error;

use super::time::SimTime;
use crate::uart::FaultLocation;

/// Result alias used throughout the crate.
pub type BenchResult<T> = Result<T, BenchError>;

/// Errors raised by the kernel, the protocol drivers and the scenarios.
#[derive(Debug, Error)]
pub enum BenchError {
    /// An awaited condition did not occur within its time budget.
    #[error("timed out after {after} waiting for {waiting_for}")]
    Timeout {
        /// Human-readable description of the awaited condition.
        waiting_for: String,
        /// Simulated time spent waiting.
        after: SimTime,
    },

    /// The kernel ran out of scheduled events while a wait was pending.
    ///
    /// Happens when a scenario waits on a signal before starting any clock.
    #[error("simulation stalled at {at}: no clock is running while waiting for {waiting_for}")]
    Stalled {
        /// Human-readable description of the awaited condition.
        waiting_for: String,
        /// Simulated time at which the event queue ran dry.
        at: SimTime,
    },

    /// A signal name is not part of the device interface.
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    /// A clock was started twice on the same signal.
    #[error("clock already running on '{0}'")]
    ClockAlreadyRunning(String),

    /// A sampled value differs from the reference model.
    #[error("{what} mismatch: expected {expected:#x}, got {actual:#x}")]
    Mismatch {
        /// What was being checked (e.g. `"io_value"`, `"duty cycle readback"`).
        what: String,
        /// Value predicted by the model.
        expected: u64,
        /// Value sampled from the device.
        actual: u64,
    },

    /// The UART receiver decoded a different byte than was transmitted.
    #[error(
        "decoded byte mismatch: expected {expected:#04x}, observed {observed:#04x} ({}, seed {seed:#x})",
        describe_fault(.fault)
    )]
    UartMismatch {
        /// Payload that was driven onto the line.
        expected: u8,
        /// Byte reported on the receive-payload output.
        observed: u8,
        /// Where noise was injected into the frame, if anywhere.
        fault: Option<FaultLocation>,
        /// Seed of the fault generator, for replaying the run.
        seed: u64,
    },

    /// An output held the wrong level at a specific internal timer value.
    #[error("{signal} expected {expected} when timer == {timer}, got {actual}")]
    ProtocolTiming {
        /// Output that was checked.
        signal: String,
        /// Level required at this timer value.
        expected: u64,
        /// Level sampled from the device.
        actual: u64,
        /// Internal timer value at the time of the check.
        timer: u64,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Shorthand for a [`BenchError::Mismatch`].
    pub fn mismatch(what: impl Into<String>, expected: u64, actual: u64) -> Self {
        Self::Mismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Returns true for failures caused by a signal never reaching its awaited state.
    pub const fn is_hang(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Stalled { .. })
    }
}

fn describe_fault(fault: &Option<FaultLocation>) -> String {
    fault.map_or_else(|| "no noise injected".to_owned(), |f| f.to_string())
}
