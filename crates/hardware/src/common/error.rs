//! Error definitions for the interrupt controller model.
//!
//! This module defines the single error type returned by every fallible operation. It covers:
//! 1. **Configuration errors:** Fatal, construction-time problems (CPU count, EIRQ line, clock).
//! 2. **Port precondition violations:** Invalid CPU or line indices presented to the inbound ports.
//! 3. **Loading errors:** Failures while reading or deserializing a configuration or trace file.

use thiserror::Error;

/// Errors raised by the IRQMP model and its surrounding simulation helpers.
///
/// Run-time register operations never fail; only construction and the
/// hardware-facing ports validate their inputs and report through this type.
#[derive(Debug, Error)]
pub enum IrqmpError {
    /// The configured CPU count is zero or exceeds the sixteen CPUs the controller can serve.
    #[error("the IRQMP can only handle 1 to 16 CPUs, got {0}")]
    CpuCountOutOfRange(usize),

    /// The extended interrupt line does not fit the 4-bit EIRQ field of MPSTAT.
    #[error("extended interrupt line must be in 0..=15, got {0}")]
    ExtendedLineOutOfRange(u32),

    /// A clock period of zero would collapse every scheduling delay onto the current instant.
    #[error("clock period must be non-zero")]
    ZeroClockPeriod,

    /// A CPU index outside `0..ncpu` was presented to a port.
    #[error("cpu {cpu} out of range (controller serves {ncpu} cpus)")]
    InvalidCpu {
        /// The rejected CPU index.
        cpu: usize,
        /// Number of CPUs the controller was built for.
        ncpu: usize,
    },

    /// An interrupt line outside `0..32` was presented to a port.
    #[error("interrupt line {0} out of range (0..=31)")]
    InvalidLine(u32),

    /// Line 0 is architecturally reserved and can neither be raised nor acknowledged.
    #[error("interrupt line {0} is reserved")]
    ReservedLine(u32),

    /// Two registers were created at the same offset or with the same key.
    #[error("register already defined at offset {0:#04x}")]
    DuplicateRegister(u64),

    /// A configuration or trace document could not be deserialized.
    #[error("invalid document: {0}")]
    Config(#[from] serde_json::Error),

    /// A configuration or trace file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IrqmpError>;
