//! 8-N-1 serial frame encoding.
//!
//! A frame is ten logical bits: a low start bit, eight data bits LSB-first and a
//! high stop bit. Frames are immutable once built from their payload.

use std::fmt;

use super::sampler::{BitSamples, SampleEvent};
use crate::config::FrameConfig;

/// Logical bits in one frame.
pub const FRAME_BITS: usize = 10;
/// Position of the start bit.
pub const START_BIT: u8 = 0;
/// Position of the stop bit.
pub const STOP_BIT: u8 = 9;
/// Number of data bits.
pub const DATA_BITS: u8 = 8;

/// Human-readable name of a frame bit position.
pub fn bit_name(position: u8) -> String {
    match position {
        START_BIT => "start bit".to_owned(),
        STOP_BIT => "stop bit".to_owned(),
        p if p < STOP_BIT => format!("data bit {}", p - 1),
        p => format!("bit {p} (outside frame)"),
    }
}

/// One encoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialFrame {
    payload: u8,
    bits: [bool; FRAME_BITS],
}

impl SerialFrame {
    /// Encodes `payload`. Total and deterministic.
    pub fn encode(payload: u8) -> Self {
        let mut bits = [false; FRAME_BITS];
        for (index, slot) in bits[1..=usize::from(DATA_BITS)].iter_mut().enumerate() {
            *slot = (payload >> index) & 1 == 1;
        }
        bits[usize::from(STOP_BIT)] = true;
        Self { payload, bits }
    }

    /// Recovers the payload from ten logical bits.
    ///
    /// Returns `None` on a framing error (start bit high or stop bit low).
    pub fn decode(bits: &[bool; FRAME_BITS]) -> Option<u8> {
        if bits[usize::from(START_BIT)] || !bits[usize::from(STOP_BIT)] {
            return None;
        }
        Some(
            bits[1..=usize::from(DATA_BITS)]
                .iter()
                .enumerate()
                .fold(0u8, |byte, (index, &bit)| byte | (u8::from(bit) << index)),
        )
    }

    /// The byte this frame carries.
    pub const fn payload(&self) -> u8 {
        self.payload
    }

    /// Logical bits in transmission order.
    pub const fn bits(&self) -> &[bool; FRAME_BITS] {
        &self.bits
    }

    /// Logical value at `position`, or `None` outside the frame.
    pub fn bit(&self, position: u8) -> Option<bool> {
        self.bits.get(usize::from(position)).copied()
    }

    /// Lazily produces every oversample of the frame, in transmission order.
    ///
    /// Yields exactly `FRAME_BITS * samples_per_bit` events. The bit selected by
    /// `config.noisy_bit` gets its `noisy_sample` corrupted; all others are clean.
    pub fn samples(&self, config: &FrameConfig) -> impl Iterator<Item = SampleEvent> + use<> {
        let bits = self.bits;
        let samples_per_bit = config.samples_per_bit;
        let noisy_bit = config.noisy_bit;
        let noisy_sample = config.noisy_sample;
        (START_BIT..=STOP_BIT).flat_map(move |position| {
            let corrupt = if noisy_bit == Some(position) {
                noisy_sample
            } else {
                None
            };
            BitSamples::new(
                position,
                bits[usize::from(position)],
                samples_per_bit,
                corrupt,
            )
        })
    }
}

impl fmt::Display for SerialFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
