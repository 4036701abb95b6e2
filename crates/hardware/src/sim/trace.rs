//! Stimulus traces.
//!
//! A trace is a JSON document listing timed stimuli for one controller:
//!
//! ```json
//! {
//!   "events": [
//!     { "cycle": 0, "op": "write", "addr": 512, "value": 32 },
//!     { "cycle": 1, "op": "assert", "line": 5 },
//!     { "cycle": 9, "op": "ack", "irq": 5, "cpu": 1 }
//!   ],
//!   "run_until": 20
//! }
//! ```
//!
//! Cycles are absolute clock cycles of the controller's clock; events sharing a
//! cycle are applied in document order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{Result, Timestamp};

/// One stimulus applied to the controller.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TraceAction {
    /// Drive an interrupt input line.
    Assert {
        /// Line number.
        line: u32,
        /// Level driven; defaults to asserted.
        #[serde(default = "asserted")]
        value: bool,
    },
    /// Acknowledge an interrupt on behalf of a processor.
    Ack {
        /// Acknowledged line.
        irq: u32,
        /// Acknowledging CPU.
        cpu: usize,
    },
    /// Bus write.
    Write {
        /// Absolute bus address.
        addr: u64,
        /// Value written.
        value: u32,
        /// Byte lanes enabled; defaults to all four.
        #[serde(default = "all_lanes")]
        byte_enable: u8,
    },
    /// Bus read; the value is reported in the replay output.
    Read {
        /// Absolute bus address.
        addr: u64,
    },
    /// Change the run status a CPU reports.
    SetRunning {
        /// CPU index.
        cpu: usize,
        /// Reported status.
        running: bool,
    },
    /// Reset the controller.
    Reset,
}

const fn asserted() -> bool {
    true
}

const fn all_lanes() -> u8 {
    crate::soc::regfile::ALL_BYTES
}

/// A stimulus together with the cycle it is applied at.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TraceEvent {
    /// Absolute clock cycle.
    pub cycle: u64,
    /// Stimulus.
    #[serde(flatten)]
    pub action: TraceAction,
}

/// A complete stimulus trace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Trace {
    /// Stimuli; replayed in cycle order.
    #[serde(default)]
    pub events: Vec<TraceEvent>,
    /// Cycle to run to after the last stimulus; queued evaluations always settle.
    #[serde(default)]
    pub run_until: Option<u64>,
}

impl Trace {
    /// Parses a trace from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::IrqmpError::Config`] for malformed documents.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::IrqmpError::Io`] if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Result of one bus read performed during replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReadRecord {
    /// Time of the read.
    pub at: Timestamp,
    /// Absolute bus address.
    pub addr: u64,
    /// Value returned.
    pub value: u32,
}
