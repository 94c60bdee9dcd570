//! Simulated time.
//!
//! All scheduling in the kernel is done on an integer picosecond timeline so
//! that sub-nanosecond clocks (the counter bench toggles every 0.5 ns) and
//! microsecond-scale UART bit periods share one exact representation.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use serde::Deserialize;

/// Picoseconds per nanosecond.
const PS_PER_NS: u64 = 1_000;
/// Picoseconds per microsecond.
const PS_PER_US: u64 = 1_000_000;
/// Picoseconds per millisecond.
const PS_PER_MS: u64 = 1_000_000_000;
/// Picoseconds per second.
pub const PS_PER_SECOND: u64 = 1_000_000_000_000;

/// Unit attached to a time quantity in configuration and stimulus code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Picoseconds (kernel resolution).
    Ps,
    /// Nanoseconds.
    #[default]
    Ns,
    /// Microseconds.
    Us,
    /// Milliseconds.
    Ms,
}

impl TimeUnit {
    /// Number of picoseconds in one unit.
    pub const fn picos(self) -> u64 {
        match self {
            Self::Ps => 1,
            Self::Ns => PS_PER_NS,
            Self::Us => PS_PER_US,
            Self::Ms => PS_PER_MS,
        }
    }
}

/// A point on (or a span of) the simulated timeline, in picoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct SimTime(u64);

impl SimTime {
    /// Time zero, the start of every simulation.
    pub const ZERO: Self = Self(0);

    /// Creates a time from a raw picosecond count.
    pub const fn from_ps(ps: u64) -> Self {
        Self(ps)
    }

    /// Creates a time from whole nanoseconds, saturating at the end of the timeline.
    pub const fn from_ns(ns: u64) -> Self {
        Self::new(ns, TimeUnit::Ns)
    }

    /// Creates a time from whole microseconds, saturating at the end of the timeline.
    pub const fn from_us(us: u64) -> Self {
        Self::new(us, TimeUnit::Us)
    }

    /// Creates a time from a quantity expressed in `unit`, saturating at the
    /// end of the timeline.
    pub const fn new(amount: u64, unit: TimeUnit) -> Self {
        Self(amount.saturating_mul(unit.picos()))
    }

    /// Like [`new`](Self::new), but `None` when the span does not fit.
    pub const fn checked_new(amount: u64, unit: TimeUnit) -> Option<Self> {
        match amount.checked_mul(unit.picos()) {
            Some(ps) => Some(Self(ps)),
            None => None,
        }
    }

    /// Raw picosecond count.
    pub const fn as_ps(self) -> u64 {
        self.0
    }

    /// Whole nanoseconds (truncating).
    pub const fn as_ns(self) -> u64 {
        self.0 / PS_PER_NS
    }

    /// Duration of one bit at `baud_rate` bits per second, truncated to the
    /// kernel resolution. Returns `None` for a zero baud rate.
    pub const fn bit_period(baud_rate: u32) -> Option<Self> {
        if baud_rate == 0 {
            None
        } else {
            Some(Self(PS_PER_SECOND / baud_rate as u64))
        }
    }

    /// Splits this span into `parts` equal slices (truncating).
    pub const fn divide(self, parts: u32) -> Option<Self> {
        if parts == 0 {
            None
        } else {
            Some(Self(self.0 / parts as u64))
        }
    }

    /// Scales this span by an integer factor, saturating.
    pub const fn times(self, factor: u64) -> Self {
        Self(self.0.saturating_mul(factor))
    }

    /// Difference to an earlier time, clamped at zero.
    pub const fn saturating_sub(self, earlier: Self) -> Self {
        Self(self.0.saturating_sub(earlier.0))
    }
}

impl Add for SimTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for SimTime {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for SimTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ps = self.0;
        if ps % PS_PER_US == 0 && ps != 0 {
            write!(f, "{} us", ps / PS_PER_US)
        } else if ps % PS_PER_NS == 0 {
            write!(f, "{} ns", ps / PS_PER_NS)
        } else {
            write!(f, "{ps} ps")
        }
    }
}
