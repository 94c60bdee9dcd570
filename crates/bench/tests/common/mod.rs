//! Shared fixtures for the test suite.

/// Log capture and simulator construction.
pub mod harness;
