//! Memory-Mapped IO Devices.
//!
//! This module contains the register-mapped device models of the system,
//! currently the multiprocessor interrupt controller (IRQMP).

/// Multiprocessor interrupt controller.
pub mod irqmp;

pub use irqmp::Irqmp;

pub use crate::soc::traits::Device;
