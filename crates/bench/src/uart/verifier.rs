//! Receive-side scoreboard.

use super::transmitter::{FrameRecord, UartPins};
use crate::common::{BenchError, BenchResult, SimTime};
use crate::sim::{Dut, Simulator};

/// Outcome of comparing one received byte with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationResult {
    /// Byte that was transmitted.
    pub expected: u8,
    /// Byte the receiver reported.
    pub observed: u8,
    /// `expected == observed`.
    pub matched: bool,
}

/// Waits for the receiver's valid indicator and checks its payload.
#[derive(Debug, Clone, Copy)]
pub struct UartVerifier {
    pins: UartPins,
    timeout: SimTime,
}

impl UartVerifier {
    /// Verifier that gives the receiver `timeout` to raise valid.
    pub const fn new(pins: UartPins, timeout: SimTime) -> Self {
        Self { pins, timeout }
    }

    /// Suspends until a received byte is available and returns it.
    ///
    /// Valid already high counts as available: the receiver may raise it while
    /// the tail of the stop bit is still being driven.
    pub fn await_byte<D: Dut>(&self, sim: &mut Simulator<D>) -> BenchResult<u8> {
        if !sim.level(self.pins.valid) {
            sim.wait_for_rising(self.pins.valid, self.timeout)?;
        }
        Ok(sim.get(self.pins.payload) as u8)
    }

    /// Compares the byte received for `record` with its payload.
    ///
    /// A byte the receiver reported while the frame was still being driven is
    /// taken as is; otherwise this waits for valid like
    /// [`await_byte`](Self::await_byte).
    pub fn check<D: Dut>(
        &self,
        sim: &mut Simulator<D>,
        record: &FrameRecord,
    ) -> BenchResult<VerificationResult> {
        let expected = record.payload;
        let observed = match record.received {
            Some(byte) => byte,
            None => self.await_byte(sim)?,
        };
        Ok(VerificationResult {
            expected,
            observed,
            matched: expected == observed,
        })
    }

    /// Like [`check`](Self::check), but a mismatch is an error carrying the
    /// injected fault and the generator seed.
    ///
    /// # Arguments
    ///
    /// * `sim` - The kernel driving the receiver.
    /// * `record` - The frame as returned by the transmitter.
    /// * `seed` - Seed of the fault generator, reported on mismatch.
    pub fn verify<D: Dut>(
        &self,
        sim: &mut Simulator<D>,
        record: &FrameRecord,
        seed: u64,
    ) -> BenchResult<VerificationResult> {
        let result = self.check(sim, record)?;
        let expected = result.expected;
        let fault = record.fault;
        if !result.matched {
            tracing::error!(
                expected = format_args!("{expected:#04x}"),
                observed = format_args!("{:#04x}", result.observed),
                ?fault,
                seed,
                "decoded byte mismatch"
            );
            return Err(BenchError::UartMismatch {
                expected,
                observed: result.observed,
                fault,
                seed,
            });
        }
        tracing::info!(
            byte = format_args!("{expected:#04x}"),
            at = %sim.now(),
            "byte verified"
        );
        Ok(result)
    }
}
