//! Simulated time.
//!
//! Time is kept as an absolute count of picoseconds since the start of the
//! simulation. Scheduling delays are expressed in clock cycles and converted
//! with the controller's clock period.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// An absolute point in simulated time, in picoseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The start of simulation.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from a raw picosecond count.
    #[inline(always)]
    pub const fn from_ps(ps: u64) -> Self {
        Self(ps)
    }

    /// Returns the raw picosecond count.
    #[inline(always)]
    pub const fn as_ps(self) -> u64 {
        self.0
    }

    /// Returns the timestamp `cycles` clock periods after `self`.
    #[inline]
    pub const fn after_cycles(self, cycles: u64, period_ps: u64) -> Self {
        Self(self.0.saturating_add(cycles.saturating_mul(period_ps)))
    }
}

impl Add<u64> for Timestamp {
    type Output = Self;

    fn add(self, ps: u64) -> Self {
        Self(self.0.saturating_add(ps))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ps", self.0)
    }
}
