//! Oversampled UART stimulus.
//!
//! Encodes bytes as 8-N-1 frames, expands every bit into `samples_per_bit`
//! strobed samples (optionally corrupting one of them), drives them into a
//! receiver and checks the byte it reports.

/// Noise plans, injection points and the seeded generator.
pub mod fault;

/// 8-N-1 frame encoding.
pub mod frame;

/// Majority-vote reference decoder.
pub mod majority;

/// Per-bit sample sequences.
pub mod sampler;

/// Line driver.
pub mod transmitter;

/// Receive-side checks.
pub mod verifier;

pub use fault::{FaultLocation, FaultPlan, FaultRng};
pub use frame::{FRAME_BITS, SerialFrame};
pub use sampler::{BitSamples, SampleEvent};
pub use transmitter::{FrameRecord, UartPins, UartTransmitter};
pub use verifier::{UartVerifier, VerificationResult};
