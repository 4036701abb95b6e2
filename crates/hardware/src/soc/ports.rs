//! Processor-side signal ports of the interrupt controller.
//!
//! The controller drives one request line and one reset line per CPU and reads
//! each CPU's run status. This module defines that boundary:
//! 1. **`CpuPorts`:** The trait a host implements to receive and supply those signals.
//! 2. **`SignalRecorder`:** A ready-made implementation that logs every transition.

use serde::Serialize;

use crate::common::{CpuId, IrqLine, Timestamp};

/// Signals exchanged between the controller and the processors it serves.
pub trait CpuPorts {
    /// Drives CPU `cpu`'s interrupt request: `Some(n)` requests line `n`, `None` deasserts.
    fn set_cpu_irq(&mut self, cpu: CpuId, request: Option<u8>, at: Timestamp);

    /// Drives CPU `cpu`'s reset line.
    fn set_cpu_reset(&mut self, cpu: CpuId, asserted: bool, at: Timestamp);

    /// Returns `true` while CPU `cpu` reports itself running.
    fn cpu_running(&self, cpu: CpuId) -> bool;

    /// Receives a power event for a request delivered on `line`.
    fn power_event(&mut self, line: IrqLine, at: Timestamp) {
        let _ = (line, at);
    }
}

/// One signal transition observed on the ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum SignalEvent {
    /// Interrupt request changed.
    Irq {
        /// Target CPU index.
        cpu: usize,
        /// Requested line, or `None` when deasserted.
        request: Option<u8>,
        /// Time of the transition.
        at: Timestamp,
    },
    /// Reset line driven.
    Reset {
        /// Target CPU index.
        cpu: usize,
        /// Reset asserted.
        asserted: bool,
        /// Time of the transition.
        at: Timestamp,
    },
    /// Power event emitted for a delivered line.
    Power {
        /// Delivered line number.
        line: u32,
        /// Time of the event.
        at: Timestamp,
    },
}

/// Port implementation that records every transition and holds a settable run status per CPU.
#[derive(Clone, Debug, Default)]
pub struct SignalRecorder {
    running: Vec<bool>,
    events: Vec<SignalEvent>,
}

impl SignalRecorder {
    /// Creates a recorder for `ncpu` CPUs, all reported running.
    pub fn new(ncpu: usize) -> Self {
        Self {
            running: vec![true; ncpu],
            events: Vec::new(),
        }
    }

    /// Sets the run status reported for CPU index `cpu`; out-of-range indices are ignored.
    pub fn set_running(&mut self, cpu: usize, running: bool) {
        if let Some(slot) = self.running.get_mut(cpu) {
            *slot = running;
        }
    }

    /// All transitions recorded so far, oldest first.
    pub fn events(&self) -> &[SignalEvent] {
        &self.events
    }

    /// Removes and returns every recorded transition.
    pub fn drain(&mut self) -> Vec<SignalEvent> {
        std::mem::take(&mut self.events)
    }

    /// Interrupt request transitions for CPU index `cpu`, oldest first.
    pub fn irq_history(&self, cpu: usize) -> Vec<Option<u8>> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                SignalEvent::Irq { cpu: c, request, .. } if c == cpu => Some(request),
                _ => None,
            })
            .collect()
    }

    /// CPU indices that received a reset assertion, in order.
    pub fn resets(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                SignalEvent::Reset {
                    cpu,
                    asserted: true,
                    ..
                } => Some(cpu),
                _ => None,
            })
            .collect()
    }
}

impl CpuPorts for SignalRecorder {
    fn set_cpu_irq(&mut self, cpu: CpuId, request: Option<u8>, at: Timestamp) {
        self.events.push(SignalEvent::Irq {
            cpu: cpu.index(),
            request,
            at,
        });
    }

    fn set_cpu_reset(&mut self, cpu: CpuId, asserted: bool, at: Timestamp) {
        self.events.push(SignalEvent::Reset {
            cpu: cpu.index(),
            asserted,
            at,
        });
    }

    fn cpu_running(&self, cpu: CpuId) -> bool {
        self.running.get(cpu.index()).copied().unwrap_or(false)
    }

    fn power_event(&mut self, line: IrqLine, at: Timestamp) {
        self.events.push(SignalEvent::Power {
            line: line.number(),
            at,
        });
    }
}
