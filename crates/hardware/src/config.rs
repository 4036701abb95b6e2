//! Configuration for the interrupt controller model.
//!
//! This module defines the construction-time parameters of an IRQMP instance. It provides:
//! 1. **Defaults:** Baseline values matching a single-processor LEON3 system.
//! 2. **Structure:** `IrqmpConfig`, deserializable from JSON with per-field defaults.
//! 3. **Validation:** Range checks for the CPU count, EIRQ line, and clock period.
//!
//! Configuration is supplied as JSON (see the `irqmp-sim` CLI) or built with `IrqmpConfig::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::{IrqmpError, Result};

/// Default configuration constants for the controller.
mod defaults {
    /// APB address field of the register window (bits 19..8 of the bank address).
    pub const PADDR: u32 = 0x002;

    /// APB mask field; 0xFFF selects a single 256-byte bank.
    pub const PMASK: u32 = 0xFFF;

    /// Number of processors served.
    pub const NCPU: usize = 1;

    /// Extended interrupt line (0 = extended interrupts disabled).
    pub const EIRQ: u32 = 0;

    /// Plug & play device index on the APB bus.
    pub const PINDEX: u32 = 2;

    /// Clock period in picoseconds (100 MHz).
    pub const CLOCK_PERIOD_PS: u64 = 10_000;
}

/// Largest number of processors an IRQMP can drive.
pub const MAX_CPUS: usize = 16;

/// Construction-time parameters of one interrupt controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IrqmpConfig {
    /// APB address field; together with `pmask` defines the register window.
    #[serde(default = "IrqmpConfig::default_paddr")]
    pub paddr: u32,

    /// APB address mask field.
    #[serde(default = "IrqmpConfig::default_pmask")]
    pub pmask: u32,

    /// Number of CPUs (1..=16).
    #[serde(default = "IrqmpConfig::default_ncpu")]
    pub ncpu: usize,

    /// Extended interrupt line number; 0 disables extended interrupts.
    #[serde(default = "IrqmpConfig::default_eirq")]
    pub eirq: u32,

    /// Device index, used only for labelling reports and log output.
    #[serde(default = "IrqmpConfig::default_pindex")]
    pub pindex: u32,

    /// Length of one clock cycle in picoseconds; scheduling delays are multiples of it.
    #[serde(default = "IrqmpConfig::default_clock_period_ps")]
    pub clock_period_ps: u64,
}

impl IrqmpConfig {
    fn default_paddr() -> u32 {
        defaults::PADDR
    }

    fn default_pmask() -> u32 {
        defaults::PMASK
    }

    fn default_ncpu() -> usize {
        defaults::NCPU
    }

    fn default_eirq() -> u32 {
        defaults::EIRQ
    }

    fn default_pindex() -> u32 {
        defaults::PINDEX
    }

    fn default_clock_period_ps() -> u64 {
        defaults::CLOCK_PERIOD_PS
    }

    /// Parses a configuration from a JSON document.
    ///
    /// Missing fields take their default values. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns [`IrqmpError::Config`] for malformed JSON and any validation error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`IrqmpError::Io`] if the file cannot be read, otherwise as [`Self::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks the parameters against the controller's architectural limits.
    ///
    /// # Errors
    ///
    /// * [`IrqmpError::CpuCountOutOfRange`] unless `1 <= ncpu <= 16`.
    /// * [`IrqmpError::ExtendedLineOutOfRange`] if `eirq > 15`.
    /// * [`IrqmpError::ZeroClockPeriod`] if `clock_period_ps == 0`.
    pub fn validate(&self) -> Result<()> {
        if self.ncpu == 0 || self.ncpu > MAX_CPUS {
            return Err(IrqmpError::CpuCountOutOfRange(self.ncpu));
        }
        if self.eirq > 15 {
            return Err(IrqmpError::ExtendedLineOutOfRange(self.eirq));
        }
        if self.clock_period_ps == 0 {
            return Err(IrqmpError::ZeroClockPeriod);
        }
        Ok(())
    }

    /// Returns the register window as `(base, size)` in bus addresses.
    ///
    /// The base is `(paddr & pmask) << 8`; the size covers every address the
    /// mask leaves undecoded, in 256-byte banks.
    pub fn address_window(&self) -> (u64, u64) {
        let base = u64::from(self.paddr & self.pmask & 0xFFF) << 8;
        let size = (u64::from(!self.pmask & 0xFFF) + 1) << 8;
        (base, size)
    }
}

impl Default for IrqmpConfig {
    fn default() -> Self {
        Self {
            paddr: defaults::PADDR,
            pmask: defaults::PMASK,
            ncpu: defaults::NCPU,
            eirq: defaults::EIRQ,
            pindex: defaults::PINDEX,
            clock_period_ps: defaults::CLOCK_PERIOD_PS,
        }
    }
}
