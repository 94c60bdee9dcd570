//! Common types used throughout the testbench engine.
//!
//! 1. **Time:** Picosecond simulated time and the units stimulus code speaks in.
//! 2. **Logic:** Edge classification and width masks for signal words.
//! 3. **Errors:** The hang / mismatch / protocol-timing taxonomy.

/// Error taxonomy and result alias.
pub mod error;

/// Edges and bit helpers.
pub mod logic;

/// Simulated time.
pub mod time;

pub use error::{BenchError, BenchResult};
pub use logic::Edge;
pub use time::{SimTime, TimeUnit};
