//! Common types shared by every part of the interrupt controller model.
//!
//! This module provides the fundamental building blocks used across the crate:
//! 1. **Error Handling:** The crate-wide `IrqmpError` and `Result` alias.
//! 2. **Identifiers:** Validated CPU and interrupt-line index types.
//! 3. **Time:** Absolute simulated timestamps.

/// Error type and result alias.
pub mod error;

/// Validated CPU and line identifiers.
pub mod ids;

/// Simulated time.
pub mod time;

pub use error::{IrqmpError, Result};
pub use ids::{CpuId, FIRST_EXTENDED_LINE, IrqLine, NUM_LINES};
pub use time::Timestamp;
