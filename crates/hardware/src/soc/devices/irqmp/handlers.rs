//! Register access handlers.
//!
//! Interrupts can be cleared three ways: by software writing the clear register,
//! by software writing the force-clear half of a per-CPU force register, and by a
//! processor acknowledging the interrupt. The first two live here; the third is
//! [`Irqmp::ack_irq`].

use tracing::debug;

use super::regs::{self, Hook, RegisterId};
use super::{HW_SETTLE_CYCLES, Irqmp, SW_SETTLE_CYCLES};
use crate::common::{CpuId, FIRST_EXTENDED_LINE};
use crate::soc::ports::CpuPorts;

impl<P: CpuPorts> Irqmp<P> {
    /// Runs the action attached to a register after a bus write stored `value`.
    pub(super) fn post_write(&mut self, hook: Hook, value: u32) {
        match hook {
            Hook::Store => {}
            Hook::Reschedule => {
                debug!(device = %self.name, "pending/mask/force write");
                self.schedule(SW_SETTLE_CYCLES);
            }
            Hook::Clear => self.clear_write(value),
            Hook::CpuForce(cpu) => self.force_write(cpu, value),
            Hook::MpStat => self.mpstat_write(value),
        }
    }

    /// Runs the action attached to a register before a bus read.
    pub(super) fn pre_read(&mut self, hook: Hook) {
        if hook == Hook::MpStat {
            self.mpstat_read();
        }
    }

    /// Clears every line written to the clear register from pending and global force.
    ///
    /// Extended lines recorded for any CPU are released as well. Clearing an ordinary
    /// line, or an extended one while extended interrupts are on, deasserts the request
    /// line of every CPU.
    fn clear_write(&mut self, clear: u32) {
        let mut extended = false;
        for cpu in CpuId::ascending(self.ncpu()) {
            extended |= self.release_extended(cpu);
        }
        if clear >> FIRST_EXTENDED_LINE != 0 {
            extended = true;
        }
        if (extended && self.eirq() != 0) || clear & regs::IR_PENDING_IP != 0 {
            self.deassert_all();
        }

        let pending = self.regs.get(RegisterId::Pending) & !clear;
        self.regs.set(RegisterId::Pending, pending);
        let force = self.regs.get(RegisterId::Force) & !clear;
        self.regs.set(RegisterId::Force, force);
        self.regs.set(RegisterId::Clear, 0);
        debug!(device = %self.name, clear = format_args!("{clear:#010x}"), "clear write");
        self.schedule(HW_SETTLE_CYCLES);
    }

    /// Merges a per-CPU force write into the sticky force shadow.
    ///
    /// The low half adds force bits, the high half (IFC) removes them. The shadow is
    /// written back so the register never shows IFC bits.
    fn force_write(&mut self, cpu: CpuId, value: u32) {
        let ifc = value >> 16;
        if ifc & regs::PROC_IR_FORCE_IF != 0 {
            self.deassert(cpu);
        }

        let shadow = &mut self.force_shadow[cpu.index()];
        *shadow |= value & regs::PROC_IR_FORCE_IF;
        *shadow &= !ifc & regs::PROC_IR_FORCE_IF;
        let committed = *shadow;
        debug_assert_eq!(committed & !regs::PROC_IR_FORCE_IF, 0);
        self.regs.set(RegisterId::CpuForce(cpu), committed);

        self.clear_extended_pending(cpu);
        debug!(
            device = %self.name,
            %cpu,
            force = format_args!("{committed:#06x}"),
            "force write"
        );
        self.schedule(HW_SETTLE_CYCLES);
    }

    /// Resets every CPU whose status bit is written while it reports running.
    fn mpstat_write(&mut self, value: u32) {
        let stat = value & regs::MP_STAT_STATUS;
        for cpu in CpuId::ascending(self.ncpu()) {
            if stat & (1 << cpu.index()) != 0 && self.ports.cpu_running(cpu) {
                debug!(device = %self.name, %cpu, "cpu reset requested");
                self.ports.set_cpu_reset(cpu, true, self.now);
            }
        }
    }

    /// Regenerates MPSTAT from the geometry fields and live CPU run status.
    fn mpstat_read(&mut self) {
        let mut value = regs::mpstat_geometry(self.ncpu(), self.eirq());
        for cpu in CpuId::ascending(self.ncpu()) {
            if self.ports.cpu_running(cpu) {
                value |= 1 << cpu.index();
            }
        }
        self.regs.set(RegisterId::MpStat, value);
    }
}
