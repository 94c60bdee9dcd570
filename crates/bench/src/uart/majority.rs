//! Frame-aligned majority-vote decoder.
//!
//! Reference receiver used as a scoreboard: it assumes the sample stream is
//! already aligned to the start bit and votes over each group of
//! `samples_per_bit` samples.

use super::frame::{FRAME_BITS, SerialFrame};
use super::sampler::SampleEvent;

/// Majority of `samples`, or `None` on a tie or an empty slice.
pub fn vote(samples: &[bool]) -> Option<bool> {
    let high = samples.iter().filter(|&&s| s).count();
    let low = samples.len() - high;
    match high.cmp(&low) {
        std::cmp::Ordering::Greater => Some(true),
        std::cmp::Ordering::Less => Some(false),
        std::cmp::Ordering::Equal => None,
    }
}

/// Decodes one frame from its oversamples.
///
/// Returns `None` when the stream does not hold exactly ten groups of
/// `samples_per_bit` samples, when any bit ties, or on a framing error.
pub fn decode_samples(
    events: impl IntoIterator<Item = SampleEvent>,
    samples_per_bit: u32,
) -> Option<u8> {
    let per_bit = usize::try_from(samples_per_bit).ok().filter(|&n| n > 0)?;
    let levels: Vec<bool> = events.into_iter().map(|event| event.value).collect();
    if levels.len() != FRAME_BITS * per_bit {
        return None;
    }
    let mut bits = [false; FRAME_BITS];
    for (slot, group) in bits.iter_mut().zip(levels.chunks_exact(per_bit)) {
        *slot = vote(group)?;
    }
    SerialFrame::decode(&bits)
}
