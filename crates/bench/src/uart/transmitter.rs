//! Frame transmitter: drives oversamples onto the receive line.
//!
//! Every sample occupies one slot of `bit_period / samples_per_bit`. Within a
//! slot the line is driven first, then the sampling strobe is held high for
//! exactly one receiver clock cycle, so the receiver sees each sample at one
//! rising edge only. Slots are laid out on absolute time from the start of the
//! frame, so strobe latency never accumulates into bit-period drift.

use super::fault::FaultLocation;
use super::frame::{SerialFrame, bit_name};
use crate::common::{BenchError, BenchResult, SimTime};
use crate::config::FrameConfig;
use crate::sim::{Dut, SignalId, Simulator};

/// Receiver clock.
pub const CLK: &str = "clk";
/// Synchronous reset, active high.
pub const RESET: &str = "reset";
/// Serial receive line (idles high).
pub const RXD: &str = "io_rxd";
/// Sampling strobe.
pub const SAMPLING_TICK: &str = "io_samplingTick";
/// Decoded byte.
pub const READ_PAYLOAD: &str = "io_read_payload";
/// Receive-valid indicator.
pub const READ_VALID: &str = "io_read_valid";

/// Resolved receiver interface.
#[derive(Debug, Clone, Copy)]
pub struct UartPins {
    /// Receiver clock.
    pub clk: SignalId,
    /// Reset.
    pub reset: SignalId,
    /// Serial line.
    pub rxd: SignalId,
    /// Sampling strobe.
    pub tick: SignalId,
    /// Decoded byte output.
    pub payload: SignalId,
    /// Receive-valid output.
    pub valid: SignalId,
}

impl UartPins {
    /// Looks up every receiver signal by its fixed name.
    pub fn resolve<D: Dut>(sim: &Simulator<D>) -> BenchResult<Self> {
        Ok(Self {
            clk: sim.id(CLK)?,
            reset: sim.id(RESET)?,
            rxd: sim.id(RXD)?,
            tick: sim.id(SAMPLING_TICK)?,
            payload: sim.id(READ_PAYLOAD)?,
            valid: sim.id(READ_VALID)?,
        })
    }
}

/// What was put on the line for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRecord {
    /// Byte carried by the frame.
    pub payload: u8,
    /// Corrupted sample, if any.
    pub fault: Option<FaultLocation>,
    /// Time the first sample slot began.
    pub started: SimTime,
    /// Time the last sample slot ended.
    pub finished: SimTime,
    /// Samples driven.
    pub samples: u64,
    /// Byte the receiver reported on a rising valid edge while the frame was
    /// being driven, if it did.
    pub received: Option<u8>,
}

/// Drives frames into a receiver.
#[derive(Debug, Clone, Copy)]
pub struct UartTransmitter {
    pins: UartPins,
}

impl UartTransmitter {
    /// Transmitter on already-resolved pins.
    pub const fn new(pins: UartPins) -> Self {
        Self { pins }
    }

    /// Transmitter on the receiver's fixed signal names.
    pub fn attach<D: Dut>(sim: &Simulator<D>) -> BenchResult<Self> {
        Ok(Self::new(UartPins::resolve(sim)?))
    }

    /// Pins in use.
    pub const fn pins(&self) -> &UartPins {
        &self.pins
    }

    /// Puts the line in its idle state: high, strobe low.
    pub fn idle_line<D: Dut>(&self, sim: &mut Simulator<D>) {
        sim.set_level(self.pins.rxd, true);
        sim.set_level(self.pins.tick, false);
    }

    /// Transmits one frame carrying `payload`, with the noise `frame` selects.
    ///
    /// Start, data LSB-first and stop bits go out strictly in order, each as
    /// `samples_per_bit` strobed samples. The line is left idle high. The valid
    /// output is watched for the whole frame, so a receiver that reports its
    /// byte with a one-cycle pulse before the stop bit ends is still seen.
    ///
    /// # Arguments
    ///
    /// * `sim` - The kernel driving the receiver.
    /// * `frame` - Line format and optional fixed noise location.
    /// * `payload` - The byte to carry.
    ///
    /// # Returns
    ///
    /// A record of the frame, including the byte received during it, if any.
    pub fn send_frame<D: Dut>(
        &self,
        sim: &mut Simulator<D>,
        frame: &FrameConfig,
        payload: u8,
    ) -> BenchResult<FrameRecord> {
        frame.validate()?;
        let slot = frame.sample_period()?;
        let encoded = SerialFrame::encode(payload);
        let fault = FaultLocation::from_frame(frame);
        let started = sim.now();
        tracing::debug!(
            payload = format_args!("{payload:#04x}"),
            bits = %encoded,
            samples_per_bit = frame.samples_per_bit,
            %slot,
            "sending frame"
        );

        sim.latch_rising(self.pins.valid, self.pins.payload);
        let driven = self.drive_frame(sim, frame, encoded, started, slot);
        let captured = sim.release_latch(self.pins.valid);
        let samples = driven?;
        if captured.len() > 1 {
            tracing::warn!(
                valid_edges = captured.len(),
                "receiver reported more than one byte in one frame"
            );
        }

        let finished = started + slot.times(samples);
        Ok(FrameRecord {
            payload,
            fault,
            started,
            finished,
            samples,
            received: captured.first().map(|&byte| byte as u8),
        })
    }

    /// Drives every sample of `encoded` on absolute slots from `started` and
    /// leaves the line idle at the end of the last slot.
    fn drive_frame<D: Dut>(
        &self,
        sim: &mut Simulator<D>,
        frame: &FrameConfig,
        encoded: SerialFrame,
        started: SimTime,
        slot: SimTime,
    ) -> BenchResult<u64> {
        let mut samples = 0u64;
        for event in encoded.samples(frame) {
            if event.sample_index == 0 {
                tracing::debug!(
                    bit = %bit_name(event.bit_position),
                    value = ?encoded.bit(event.bit_position),
                    "bit"
                );
            }
            if event.corrupted {
                tracing::warn!(
                    bit = %bit_name(event.bit_position),
                    sample = event.sample_index,
                    driven = event.value,
                    "injecting noise"
                );
            }
            #[cfg(feature = "sample-trace")]
            tracing::trace!(
                bit = event.bit_position,
                sample = event.sample_index,
                value = event.value,
                "sample"
            );
            self.drive_sample(sim, started + slot.times(samples), event.value)?;
            samples += 1;
        }

        sim.set_level(self.pins.rxd, true);
        sim.advance_to(started + slot.times(samples));
        Ok(samples)
    }

    /// Transmits every byte of `payloads` back to back with the same format.
    pub fn send_bytes<D: Dut>(
        &self,
        sim: &mut Simulator<D>,
        frame: &FrameConfig,
        payloads: &[u8],
    ) -> BenchResult<Vec<FrameRecord>> {
        payloads
            .iter()
            .map(|&payload| self.send_frame(sim, frame, payload))
            .collect()
    }

    /// Strobes `samples` idle-high samples, one slot each.
    ///
    /// # Arguments
    ///
    /// * `sim` - The kernel driving the receiver.
    /// * `frame` - Line format; only its sample period is used.
    /// * `samples` - Number of idle slots to strobe.
    pub fn send_idle<D: Dut>(
        &self,
        sim: &mut Simulator<D>,
        frame: &FrameConfig,
        samples: u32,
    ) -> BenchResult<()> {
        let slot = frame.sample_period()?;
        let started = sim.now();
        for index in 0..u64::from(samples) {
            self.drive_sample(sim, started + slot.times(index), true)?;
        }
        sim.advance_to(started + slot.times(u64::from(samples)));
        Ok(())
    }

    /// Drives `level` at the start of the slot beginning at `at`, then pulses
    /// the strobe high for one clock cycle.
    fn drive_sample<D: Dut>(
        &self,
        sim: &mut Simulator<D>,
        at: SimTime,
        level: bool,
    ) -> BenchResult<()> {
        if sim.now() > at {
            return Err(BenchError::InvalidConfig(format!(
                "sampling strobe overran its slot: slot starts at {at}, now {}",
                sim.now()
            )));
        }
        sim.advance_to(at);
        sim.set_level(self.pins.rxd, level);
        sim.rising_edge(self.pins.clk)?;
        sim.set_level(self.pins.tick, true);
        sim.rising_edge(self.pins.clk)?;
        sim.set_level(self.pins.tick, false);
        Ok(())
    }
}
