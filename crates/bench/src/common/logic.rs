//! Logic-level helpers shared by the kernel and the stimulus code.

use std::fmt;

/// Direction of a transition on a single-bit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// 0 → 1.
    Rising,
    /// 1 → 0.
    Falling,
}

impl Edge {
    /// Classifies a change of the least-significant bit, if any.
    pub const fn between(old: u64, new: u64) -> Option<Self> {
        match (old & 1, new & 1) {
            (0, 1) => Some(Self::Rising),
            (1, 0) => Some(Self::Falling),
            _ => None,
        }
    }

    /// Level the signal holds right after this edge.
    pub const fn level_after(self) -> bool {
        matches!(self, Self::Rising)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rising => f.write_str("rising"),
            Self::Falling => f.write_str("falling"),
        }
    }
}

/// Mask covering the low `width` bits of a signal word.
pub const fn width_mask(width: u8) -> u64 {
    if width >= 64 { u64::MAX } else { (1u64 << width) - 1 }
}
