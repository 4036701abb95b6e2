//! Priority resolution.
//!
//! For every CPU the arbiter combines the shared pending and global force registers
//! with the CPU's mask, adds the CPU's own force bits and the extended-interrupt
//! aggregate, and picks one line to present:
//!
//! 1. Lines whose level bit is set beat every line whose level bit is clear.
//! 2. Within a level, the numerically highest line wins.
//!
//! CPUs are evaluated from the highest index down to 0.

use tracing::debug;

use super::Irqmp;
use super::regs::{self, RegisterId};
use crate::common::{CpuId, IrqLine};
use crate::soc::ports::CpuPorts;

/// Highest ordinary line (15..=1) set in `bits`.
#[inline]
fn highest_line(bits: u32) -> Option<u32> {
    let candidates = bits & regs::IR_PENDING_IP;
    (candidates != 0).then(|| 31 - candidates.leading_zeros())
}

/// Highest extended line (31..=16) set in `bits`.
#[inline]
fn highest_extended(bits: u32) -> Option<u32> {
    let candidates = bits & regs::IR_PENDING_EIP;
    (candidates != 0).then(|| 31 - candidates.leading_zeros())
}

impl<P: CpuPorts> Irqmp<P> {
    /// Evaluates and drives the request line of every CPU.
    pub(super) fn launch_irq(&mut self) {
        let eirq = self.eirq();
        for cpu in CpuId::descending(self.ncpu()) {
            let shared = self.regs.get(RegisterId::Pending) | self.regs.get(RegisterId::Force);
            let pending = shared & self.regs.get(RegisterId::Mask(cpu));
            let forced = self.regs.get(RegisterId::CpuForce(cpu)) & regs::IR_FORCE_IF;
            let masked = pending | forced;

            let eirq_active = if eirq == 0 {
                false
            } else {
                let active = masked & regs::IR_PENDING_EIP != 0;
                self.regs.set_bit(RegisterId::Pending, eirq, active);
                active
            };

            let eirq_bit = if eirq_active { 1 << eirq } else { 0 };
            let all = pending | eirq_bit | forced;
            let level = self.regs.get(RegisterId::Level);
            debug!(
                device = %self.name,
                %cpu,
                pending = format_args!("{pending:#010x}"),
                all = format_args!("{all:#010x}"),
                "arbitrate"
            );

            let high = highest_line(all & level).or_else(|| highest_line(all & !level));
            match high {
                Some(line) => self.deliver(cpu, line, pending),
                None => self.deassert(cpu),
            }
        }
    }

    /// Presents `line` to `cpu` unless it is already the request being driven.
    fn deliver(&mut self, cpu: CpuId, line: u32, pending: u32) {
        let eirq = self.eirq();
        if eirq != 0 && line == eirq && self.regs.get(RegisterId::ExtId(cpu)) == 0 {
            if let Some(ext) = highest_extended(pending) {
                self.regs.set(RegisterId::ExtId(cpu), ext);
            }
        }

        let request = Some(line as u8);
        if self.requests[cpu.index()] == request {
            return;
        }
        debug!(device = %self.name, %cpu, line, at = %self.now, "request sent");
        self.requests[cpu.index()] = request;
        self.ports.set_cpu_irq(cpu, request, self.now);
        if let Ok(irq) = IrqLine::new(line) {
            self.ports.power_event(irq, self.now);
        }
        self.stats.record_delivery(cpu);
    }
}
