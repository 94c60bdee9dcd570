//! Oversampled bit sequences.
//!
//! Each logical bit is driven as `samples_per_bit` consecutive samples. A single
//! sample may be corrupted (driven as the complement of the bit) to exercise the
//! receiver's majority vote.

/// One strobe within a bit period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleEvent {
    /// Frame bit this sample belongs to (0 = start, 9 = stop).
    pub bit_position: u8,
    /// Index of the sample inside its bit.
    pub sample_index: u32,
    /// Level driven on the line.
    pub value: bool,
    /// True when `value` is the complement of the logical bit.
    pub corrupted: bool,
}

/// Lazy, finite sequence of the oversamples of one bit.
///
/// Cloning before iteration gives an independent restart of the same bit.
#[derive(Debug, Clone)]
pub struct BitSamples {
    bit_position: u8,
    bit_value: bool,
    samples: u32,
    corrupt: Option<u32>,
    next: u32,
}

impl BitSamples {
    /// Samples of `bit_value` at `bit_position`, with `corrupt` flipped if set.
    ///
    /// A corrupt index at or beyond `samples` never matches and leaves the bit clean.
    pub const fn new(bit_position: u8, bit_value: bool, samples: u32, corrupt: Option<u32>) -> Self {
        Self {
            bit_position,
            bit_value,
            samples,
            corrupt,
            next: 0,
        }
    }

    /// Rewinds to the first sample.
    pub const fn restart(&mut self) {
        self.next = 0;
    }

    /// Logical value of the bit.
    pub const fn bit_value(&self) -> bool {
        self.bit_value
    }
}

impl Iterator for BitSamples {
    type Item = SampleEvent;

    fn next(&mut self) -> Option<SampleEvent> {
        if self.next >= self.samples {
            return None;
        }
        let sample_index = self.next;
        self.next += 1;
        let corrupted = self.corrupt == Some(sample_index);
        Some(SampleEvent {
            bit_position: self.bit_position,
            sample_index,
            value: self.bit_value ^ corrupted,
            corrupted,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.samples - self.next.min(self.samples)) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for BitSamples {}
