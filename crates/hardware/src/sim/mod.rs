//! Simulation driver and stimulus replay.
//!
//! Provides the `Simulator`, which owns a controller and moves simulated time,
//! and the JSON stimulus trace format it replays.

pub mod simulator;
pub mod trace;

pub use simulator::Simulator;
pub use trace::{ReadRecord, Trace, TraceAction, TraceEvent};
