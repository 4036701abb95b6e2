//! Validated CPU and interrupt-line identifiers.
//!
//! Strong types for the two indices that cross the controller's ports, so that
//! register and shadow arrays are only ever indexed with values checked against
//! the controller's geometry:
//! 1. **`CpuId`:** An index below the configured CPU count.
//! 2. **`IrqLine`:** One of the 32 interrupt lines.

use std::fmt;

use super::error::{IrqmpError, Result};

/// Number of interrupt lines handled by the controller.
pub const NUM_LINES: u32 = 32;

/// First extended (EIRQ) line; lines at or above this cannot be forced.
pub const FIRST_EXTENDED_LINE: u32 = 16;

/// A CPU index validated against the controller's CPU count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CpuId(u8);

impl CpuId {
    /// Validates `cpu` against a controller serving `ncpu` processors.
    ///
    /// # Errors
    ///
    /// Returns [`IrqmpError::InvalidCpu`] if `cpu >= ncpu`.
    pub fn new(cpu: usize, ncpu: usize) -> Result<Self> {
        if cpu < ncpu && cpu < 16 {
            Ok(Self(cpu as u8))
        } else {
            Err(IrqmpError::InvalidCpu { cpu, ncpu })
        }
    }

    /// Iterates all CPU ids of an `ncpu` controller from the highest index down to 0.
    pub fn descending(ncpu: usize) -> impl Iterator<Item = Self> {
        (0..ncpu.min(16)).rev().map(|c| Self(c as u8))
    }

    /// Iterates all CPU ids of an `ncpu` controller in ascending order.
    pub fn ascending(ncpu: usize) -> impl Iterator<Item = Self> {
        (0..ncpu.min(16)).map(|c| Self(c as u8))
    }

    /// Returns the raw index, usable for slice access.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CpuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cpu{}", self.0)
    }
}

/// One of the controller's 32 interrupt lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IrqLine(u8);

impl IrqLine {
    /// Validates a raw line number.
    ///
    /// # Errors
    ///
    /// Returns [`IrqmpError::InvalidLine`] for lines above 31.
    pub fn new(line: u32) -> Result<Self> {
        if line < NUM_LINES {
            Ok(Self(line as u8))
        } else {
            Err(IrqmpError::InvalidLine(line))
        }
    }

    /// Validates a line that a device or processor may actually use (1..=31).
    ///
    /// # Errors
    ///
    /// Returns [`IrqmpError::InvalidLine`] above 31 and [`IrqmpError::ReservedLine`] for line 0.
    pub fn usable(line: u32) -> Result<Self> {
        let irq = Self::new(line)?;
        if irq.0 == 0 {
            return Err(IrqmpError::ReservedLine(line));
        }
        Ok(irq)
    }

    /// Returns the line number.
    #[inline(always)]
    pub const fn number(self) -> u32 {
        self.0 as u32
    }

    /// Returns the single-bit mask selecting this line in a 32-bit register.
    #[inline(always)]
    pub const fn mask(self) -> u32 {
        1 << self.0
    }

    /// Returns `true` for lines routed through the extended interrupt aggregate.
    #[inline(always)]
    pub const fn is_extended(self) -> bool {
        self.0 as u32 >= FIRST_EXTENDED_LINE
    }
}

impl fmt::Display for IrqLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "irq{}", self.0)
    }
}
