//! Engine-independent simulation kernel.
//!
//! Provides the signal interface shared with the device, the device trait,
//! clock generators and the cooperative `Simulator` with its wait points.

/// Free-running clock generators.
pub mod clock;

/// Device-under-test trait.
pub mod dut;

/// Named signal storage.
pub mod signals;

/// The kernel and its wait points.
pub mod simulator;

pub use clock::ClockGen;
pub use dut::Dut;
pub use signals::{Direction, Port, SignalBag, SignalId};
pub use simulator::Simulator;
