//! # Unit Components
//!
//! Tests for the interrupt controller model, organized by the crate's modules.


/// Configuration defaults, deserialization, and validation.
pub mod config;
