//! System-on-Chip (SoC) Components.
//!
//! This module organizes the pieces a register-mapped device model is built from:
//! the device trait, the register file, the evaluation scheduler, the processor-side
//! ports, and the device implementations themselves.

/// Memory-mapped I/O device implementations.
pub mod devices;

/// Processor-side signal ports.
pub mod ports;

/// Register container with write masks and hooks.
pub mod regfile;

/// Deferred-evaluation scheduler.
pub mod scheduler;

/// Device trait definitions for MMIO access.
pub mod traits;

pub use devices::Irqmp;
pub use ports::{CpuPorts, SignalEvent, SignalRecorder};
pub use traits::Device;
