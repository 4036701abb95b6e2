//! Multiprocessor interrupt controller (IRQMP) model.
//!
//! This crate implements a cycle-timed model of a register-mapped interrupt controller
//! serving up to sixteen processors:
//! 1. **Common:** Errors, validated CPU/line identifiers, and simulated time.
//! 2. **Config:** Construction parameters, deserializable from JSON.
//! 3. **SoC:** Register file, evaluation scheduler, processor ports, and the IRQMP device.
//! 4. **Simulation:** A driver that owns the controller, moves time, and replays stimulus traces.
//! 5. **Statistics:** Per-line and per-CPU activity counters with an end-of-run report.

/// Common types (errors, identifiers, time).
pub mod common;
/// Controller configuration (defaults, validation, address window).
pub mod config;
/// Simulation driver and stimulus traces.
pub mod sim;
/// Register-mapped device infrastructure and the IRQMP model.
pub mod soc;
/// Interrupt activity statistics and reporting.
pub mod stats;

/// Crate error type.
pub use crate::common::{IrqmpError, Result};
/// Controller configuration; use `IrqmpConfig::default()` or load from JSON.
pub use crate::config::IrqmpConfig;
/// Simulation driver; construct with `Simulator::from_config`.
pub use crate::sim::Simulator;
/// The interrupt controller device.
pub use crate::soc::devices::Irqmp;
