//! Noise injection planning.
//!
//! A [`FaultPlan`] decides, per frame, which single sample of which bit is
//! driven inverted. Random plans draw from a [`FaultRng`] whose seed is logged
//! and carried in every UART failure so a run can be replayed exactly.

use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::BuildHasher;

use serde::Deserialize;

use super::frame::{DATA_BITS, FRAME_BITS, bit_name};
use crate::config::FrameConfig;

/// Seed substituted for zero, which is a fixed point of xorshift.
const NONZERO_SEED: u64 = 123_456_789;

/// Resolved injection point of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaultLocation {
    /// Frame bit position (0 = start, 9 = stop).
    pub bit: u8,
    /// Corrupted sample index within the bit.
    pub sample: u32,
}

impl FaultLocation {
    /// Location carried by `frame`, if it has one.
    ///
    /// A bit without a sample index corrupts nothing and yields `None`.
    pub const fn from_frame(frame: &FrameConfig) -> Option<Self> {
        match (frame.noisy_bit, frame.noisy_sample) {
            (Some(bit), Some(sample)) => Some(Self { bit, sample }),
            _ => None,
        }
    }
}

impl fmt::Display for FaultLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "noise on {} sample {}", bit_name(self.bit), self.sample)
    }
}

/// How the noise location is chosen for each transmitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPlan {
    /// No corruption.
    Clean,
    /// Use `noisy_bit`/`noisy_sample` from the frame configuration.
    ///
    /// When only the bit is given, the sample index is drawn at random.
    Fixed,
    /// One random sample of one random data bit (1..=8).
    #[default]
    RandomData,
    /// One random sample of any frame bit, start and stop included.
    RandomAny,
}

impl FaultPlan {
    /// Frame configuration to transmit with, noise resolved.
    pub fn resolve(self, frame: &FrameConfig, rng: &mut FaultRng) -> FrameConfig {
        let samples = u64::from(frame.samples_per_bit.max(1));
        let pick_sample = |rng: &mut FaultRng| rng.below(samples) as u32;
        match self {
            Self::Clean => frame.clean(),
            Self::Fixed => match (frame.noisy_bit, frame.noisy_sample) {
                (Some(bit), None) => frame.with_noise(bit, pick_sample(rng)),
                _ => *frame,
            },
            Self::RandomData => {
                let bit = 1 + rng.below(u64::from(DATA_BITS)) as u8;
                frame.with_noise(bit, pick_sample(rng))
            }
            Self::RandomAny => {
                let bit = rng.below(FRAME_BITS as u64) as u8;
                frame.with_noise(bit, pick_sample(rng))
            }
        }
    }
}

/// Seeded xorshift64 generator for reproducible stimulus choices.
#[derive(Debug, Clone)]
pub struct FaultRng {
    seed: u64,
    state: u64,
}

impl FaultRng {
    /// Generator starting from `seed`. Zero is replaced by a fixed nonzero seed.
    pub const fn new(seed: u64) -> Self {
        let seed = if seed == 0 { NONZERO_SEED } else { seed };
        Self { seed, state: seed }
    }

    /// Generator seeded from per-process hasher entropy.
    pub fn from_entropy() -> Self {
        Self::new(RandomState::new().hash_one(std::time::Instant::now()))
    }

    /// Uses `seed` when given, entropy otherwise.
    pub fn from_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// Seed this generator started from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Next raw 64-bit draw.
    pub const fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform-ish draw in `0..bound`; zero for an empty range.
    pub const fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_u64() % bound
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        unit < p
    }
}
