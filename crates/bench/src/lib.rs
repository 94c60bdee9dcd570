//! Cycle-driven testbench engine for small RTL blocks.
//!
//! This crate drives a device model through its named signals and checks its
//! responses:
//! 1. **Kernel:** Picosecond time, clock generators and cooperative wait points.
//! 2. **UART:** 8-N-1 frames expanded into strobed oversamples with single-sample
//!    noise injection, plus a majority-vote reference decoder.
//! 3. **Bus:** Select/enable register transactions with fixed setup, access and
//!    recovery timing.
//! 4. **Scenarios:** Counter, PWM, UART receiver and dual-clock memory summer.
//! 5. **Support:** JSON configuration, error taxonomy and run statistics.

/// Register bus master.
pub mod apb;
/// Common types (time, edges, errors).
pub mod common;
/// Testbench configuration (defaults, per-scenario sections, JSON loading).
pub mod config;
/// Stimulus procedures per device family.
pub mod scenarios;
/// Simulation kernel (signals, device trait, clocks, wait points).
pub mod sim;
/// Kernel activity statistics.
pub mod stats;
/// Oversampled serial frame stimulus.
pub mod uart;

/// Error type shared by every operation; `BenchResult<T>` is its result alias.
pub use crate::common::{BenchError, BenchResult, SimTime};
/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Kernel and the device trait it drives.
pub use crate::sim::{Dut, Simulator};
