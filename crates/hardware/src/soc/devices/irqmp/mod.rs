//! Multiprocessor Interrupt Controller (IRQMP).
//!
//! The IRQMP collects requests from 32 interrupt lines and drives one request line per
//! processor. Each CPU sees the shared pending register through its own mask plus a
//! private force register; a two-level priority scheme picks the line presented to it.
//!
//! State changes come from three directions:
//! 1. **Hardware:** devices assert lines (`assert_line`).
//! 2. **Software:** register writes through the bus (`Device::write`).
//! 3. **Processors:** acknowledgments of taken interrupts (`ack_irq`).
//!
//! None of these evaluate the outputs directly. They update register state and post an
//! evaluation token a fixed number of clock cycles ahead; the arbiter runs when simulated
//! time reaches the token (see [`Irqmp::advance_to`]).

/// Priority resolution.
mod arbiter;
/// Register write and read handlers.
mod handlers;
/// Register map.
pub mod regs;

use tracing::{debug, info, warn};

use crate::common::{CpuId, IrqLine, Result, Timestamp};
use crate::config::IrqmpConfig;
use crate::soc::devices::Device;
use crate::soc::ports::{CpuPorts, SignalRecorder};
use crate::soc::regfile::{RegisterDescriptor, RegisterFile};
use crate::soc::scheduler::EvalScheduler;
use crate::stats::IrqmpStats;

pub use regs::{Hook, RegisterId};

/// Cycles between a hardware line, clear, force, or acknowledge event and arbitration.
pub const HW_SETTLE_CYCLES: u64 = 2;

/// Cycles between a pending, mask, or global force write and arbitration.
pub const SW_SETTLE_CYCLES: u64 = 1;

/// IRQMP device model.
#[derive(Debug)]
pub struct Irqmp<P: CpuPorts = SignalRecorder> {
    name: String,
    config: IrqmpConfig,
    regs: RegisterFile<RegisterId, Hook>,
    /// Sticky force bits per CPU, reconciled into the force registers on every write.
    force_shadow: Vec<u32>,
    /// Request currently driven towards each CPU.
    requests: Vec<Option<u8>>,
    stats: IrqmpStats,
    scheduler: EvalScheduler,
    now: Timestamp,
    ports: P,
}

impl<P: CpuPorts> Irqmp<P> {
    /// Creates a controller in its reset state.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry, address window, and clock of the controller.
    /// * `ports` - Processor-side signal sink.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if `config` fails validation.
    pub fn new(config: &IrqmpConfig, ports: P) -> Result<Self> {
        config.validate()?;
        let ncpu = config.ncpu;
        let regs = regs::build_register_file(ncpu, config.eirq)?;
        let name = format!("irqmp{}", config.pindex);

        let (base, size) = config.address_window();
        info!(
            device = %name,
            base = format_args!("{base:#010x}"),
            size = format_args!("{size:#x}"),
            paddr = format_args!("{:#x}", config.paddr),
            pmask = format_args!("{:#x}", config.pmask),
            ncpu,
            eirq = config.eirq,
            pindex = config.pindex,
            "created interrupt controller"
        );

        Ok(Self {
            stats: IrqmpStats::new(name.clone(), ncpu),
            name,
            config: config.clone(),
            regs,
            force_shadow: vec![0; ncpu],
            requests: vec![None; ncpu],
            scheduler: EvalScheduler::new(),
            now: Timestamp::ZERO,
            ports,
        })
    }

    /// Number of CPUs served.
    pub fn ncpu(&self) -> usize {
        self.config.ncpu
    }

    /// Extended interrupt line (0 when disabled).
    pub fn eirq(&self) -> u32 {
        self.config.eirq
    }

    /// Configuration the controller was built with.
    pub fn config(&self) -> &IrqmpConfig {
        &self.config
    }

    /// Validates a CPU index against this controller.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::IrqmpError::InvalidCpu`] if out of range.
    pub fn cpu(&self, index: usize) -> Result<CpuId> {
        CpuId::new(index, self.ncpu())
    }

    /// Current simulated time of the controller.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Raw register value, bypassing read hooks.
    pub fn register(&self, id: RegisterId) -> u32 {
        self.regs.get(id)
    }

    /// Every register with its current value, in map order.
    pub fn registers(&self) -> impl Iterator<Item = (&RegisterDescriptor<RegisterId, Hook>, u32)> {
        self.regs.iter()
    }

    /// Sticky force bits of `cpu`.
    pub fn force_shadow(&self, cpu: CpuId) -> u32 {
        self.force_shadow[cpu.index()]
    }

    /// Request currently driven towards `cpu`.
    pub fn cpu_request(&self, cpu: CpuId) -> Option<u8> {
        self.requests[cpu.index()]
    }

    /// Activity counters.
    pub fn stats(&self) -> &IrqmpStats {
        &self.stats
    }

    /// Evaluation tokens not yet released.
    pub fn scheduler(&self) -> &EvalScheduler {
        &self.scheduler
    }

    /// Processor-side port sink.
    pub fn ports(&self) -> &P {
        &self.ports
    }

    /// Mutable access to the port sink (e.g. to change reported CPU run status).
    pub fn ports_mut(&mut self) -> &mut P {
        &mut self.ports
    }

    /// Posts an arbitration token `cycles` clock cycles from now.
    fn schedule(&mut self, cycles: u64) {
        let at = self.now.after_cycles(cycles, self.config.clock_period_ps);
        if !self.scheduler.notify(at) {
            debug!(device = %self.name, %at, "arbitration already scheduled");
        }
    }

    /// Deasserts `cpu`'s request line whatever it presents.
    ///
    /// The next arbitration re-delivers any line that is still eligible.
    fn deassert(&mut self, cpu: CpuId) {
        if self.requests[cpu.index()].take().is_some() {
            self.ports.set_cpu_irq(cpu, None, self.now);
        }
    }

    fn deassert_all(&mut self) {
        for cpu in CpuId::ascending(self.ncpu()) {
            self.deassert(cpu);
        }
    }

    /// Runs every arbitration due up to `until`, then moves the controller's clock there.
    ///
    /// Each token is evaluated with the controller's clock set to the token's own
    /// timestamp, so output transitions carry the time they would occur in hardware.
    /// Times earlier than the controller's clock are ignored.
    pub fn advance_to(&mut self, until: Timestamp) {
        while let Some(due) = self.scheduler.pop_due(until) {
            self.now = self.now.max(due);
            self.launch_irq();
        }
        self.now = self.now.max(until);
    }

    /// Runs every queued arbitration, advancing time to the last one.
    pub fn settle(&mut self) -> Timestamp {
        while let Some(deadline) = self.scheduler.next_deadline() {
            self.advance_to(deadline);
        }
        self.now
    }

    /// Hardware interrupt input.
    ///
    /// Only an assertion has an effect; a deasserting edge is ignored because
    /// lines latch into the pending or force registers.
    ///
    /// # Errors
    ///
    /// Rejects lines above 31 and the reserved line 0.
    pub fn assert_line(&mut self, line: u32, value: bool, at: Timestamp) -> Result<()> {
        let irq = IrqLine::usable(line)?;
        self.advance_to(at);
        if !value {
            return Ok(());
        }
        self.stats.record_line(irq);

        let n = irq.number();
        if !self.regs.bit(RegisterId::Broadcast, n) {
            self.regs.set_bit(RegisterId::Pending, n, true);
        } else if !irq.is_extended() {
            for cpu in CpuId::ascending(self.ncpu()) {
                self.regs.set_bit(RegisterId::CpuForce(cpu), n, true);
                self.force_shadow[cpu.index()] |= irq.mask();
            }
        }
        debug!(device = %self.name, line = n, at = %self.now, "interrupt asserted");
        self.schedule(HW_SETTLE_CYCLES);
        Ok(())
    }

    /// Processor acknowledgment of a taken interrupt.
    ///
    /// # Errors
    ///
    /// Rejects invalid CPU indices, lines above 31, and the reserved line 0.
    pub fn ack_irq(&mut self, irq: u32, cpu: usize, at: Timestamp) -> Result<()> {
        let line = IrqLine::usable(irq)?;
        let cpu = self.cpu(cpu)?;
        self.advance_to(at);

        self.clear_extended_pending(cpu);

        let n = line.number();
        if self.regs.bit(RegisterId::Broadcast, n) {
            self.regs.set_bit(RegisterId::CpuForce(cpu), n, false);
            self.force_shadow[cpu.index()] &= !line.mask() & regs::PROC_IR_FORCE_IF;
        }

        self.deassert(cpu);
        self.regs.set_bit(RegisterId::Pending, n, false);
        self.regs.set_bit(RegisterId::Force, n, false);
        self.regs.set(RegisterId::ExtId(cpu), 0);
        debug!(device = %self.name, %cpu, line = n, at = %self.now, "interrupt acknowledged");
        self.schedule(HW_SETTLE_CYCLES);
        Ok(())
    }

    /// Extended line recorded in `cpu`'s id register, if extended interrupts are on.
    fn recorded_extended(&self, cpu: CpuId) -> Option<u32> {
        if self.eirq() == 0 {
            return None;
        }
        let id = self.regs.get(RegisterId::ExtId(cpu)) & regs::PROC_EXTIR_ID_EID;
        (id != 0).then_some(id)
    }

    /// Clears the extended line recorded for `cpu` from the pending register.
    ///
    /// The record itself is kept.
    fn clear_extended_pending(&mut self, cpu: CpuId) {
        if let Some(id) = self.recorded_extended(cpu) {
            self.regs.set_bit(RegisterId::Pending, id, false);
        }
    }

    /// Clears the extended line recorded for `cpu` from pending and drops the record.
    ///
    /// Returns `true` if a line was recorded.
    fn release_extended(&mut self, cpu: CpuId) -> bool {
        let Some(id) = self.recorded_extended(cpu) else {
            return false;
        };
        self.regs.set_bit(RegisterId::Pending, id, false);
        self.regs.set(RegisterId::ExtId(cpu), 0);
        true
    }

    /// Restores documented register defaults.
    ///
    /// Clears the force shadows and extended ids, deasserts every request line, and
    /// asserts the boot processor's reset. Activity counters and queued evaluation
    /// tokens survive.
    fn reset_state(&mut self) {
        self.regs.reset();
        self.force_shadow.fill(0);
        self.deassert_all();
        if let Ok(boot) = self.cpu(0) {
            self.ports.set_cpu_reset(boot, true, self.now);
        }
        debug!(device = %self.name, at = %self.now, "reset");
    }
}

impl<P: CpuPorts> Device for Irqmp<P> {
    fn name(&self) -> &str {
        "IRQMP"
    }

    fn address_range(&self) -> (u64, u64) {
        self.config.address_window()
    }

    fn read_u32(&mut self, offset: u64) -> u32 {
        let Some(id) = self.regs.lookup(offset) else {
            warn!(device = %self.name, offset = format_args!("{offset:#04x}"), "read from unmapped offset");
            return 0;
        };
        if let Some(hook) = self.regs.hook(id) {
            self.pre_read(hook);
        }
        self.regs.get(id)
    }

    fn write(&mut self, offset: u64, val: u32, byte_enable: u8) {
        let Some(id) = self.regs.lookup(offset) else {
            warn!(device = %self.name, offset = format_args!("{offset:#04x}"), "write to unmapped offset");
            return;
        };
        let Some(value) = self.regs.bus_write(id, val, byte_enable) else {
            return;
        };
        if let Some(hook) = self.regs.hook(id) {
            self.post_write(hook, value);
        }
    }

    fn reset(&mut self) {
        self.reset_state();
    }
}
