//! Simulator: owns one interrupt controller and drives simulated time.
//!
//! Addresses given to the simulator are absolute bus addresses; accesses outside the
//! controller's window are not dispatched and only produce a warning, the way a bus
//! transport would route them elsewhere.

use tracing::warn;

use crate::common::{Result, Timestamp};
use crate::config::IrqmpConfig;
use crate::sim::trace::{ReadRecord, Trace, TraceAction};
use crate::soc::devices::{Device, Irqmp};
use crate::soc::ports::{CpuPorts, SignalRecorder};
use crate::stats::IrqmpStats;

/// Top-level simulator: one IRQMP plus the clock that drives it.
#[derive(Debug)]
pub struct Simulator<P: CpuPorts = SignalRecorder> {
    /// The controller under simulation.
    pub irqmp: Irqmp<P>,
}

impl Simulator<SignalRecorder> {
    /// Builds a simulator whose ports record every signal, with all CPUs running.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if `config` fails validation.
    pub fn from_config(config: &IrqmpConfig) -> Result<Self> {
        let ports = SignalRecorder::new(config.ncpu);
        Ok(Self::new(Irqmp::new(config, ports)?))
    }

    /// Replays a stimulus trace and returns the values of every bus read it performed.
    ///
    /// Events are applied in cycle order; queued evaluations are settled at the end,
    /// after running to `run_until` if given.
    ///
    /// # Errors
    ///
    /// Stops at the first stimulus the controller rejects.
    pub fn replay(&mut self, trace: &Trace) -> Result<Vec<ReadRecord>> {
        let mut events = trace.events.clone();
        events.sort_by_key(|e| e.cycle);

        let mut reads = Vec::new();
        for event in &events {
            self.advance_to(self.cycle_time(event.cycle));
            match event.action {
                TraceAction::Assert { line, value } => self.assert_line(line, value)?,
                TraceAction::Ack { irq, cpu } => self.ack(irq, cpu)?,
                TraceAction::Write {
                    addr,
                    value,
                    byte_enable,
                } => self.bus_write(addr, value, byte_enable),
                TraceAction::Read { addr } => {
                    let value = self.bus_read(addr);
                    reads.push(ReadRecord {
                        at: self.now(),
                        addr,
                        value,
                    });
                }
                TraceAction::SetRunning { cpu, running } => {
                    let cpu = self.irqmp.cpu(cpu)?;
                    self.irqmp.ports_mut().set_running(cpu.index(), running);
                }
                TraceAction::Reset => self.irqmp.reset(),
            }
        }
        if let Some(cycle) = trace.run_until {
            self.advance_to(self.cycle_time(cycle));
        }
        let _ = self.settle();
        Ok(reads)
    }
}

impl<P: CpuPorts> Simulator<P> {
    /// Wraps an existing controller.
    pub fn new(irqmp: Irqmp<P>) -> Self {
        Self { irqmp }
    }

    /// Current simulated time.
    pub fn now(&self) -> Timestamp {
        self.irqmp.now()
    }

    /// Timestamp of absolute clock cycle `cycle`.
    pub fn cycle_time(&self, cycle: u64) -> Timestamp {
        Timestamp::ZERO.after_cycles(cycle, self.irqmp.config().clock_period_ps)
    }

    /// Whole clock cycles elapsed.
    pub fn cycles(&self) -> u64 {
        self.now().as_ps() / self.irqmp.config().clock_period_ps
    }

    /// Moves time forward to `until`, running every evaluation due on the way.
    pub fn advance_to(&mut self, until: Timestamp) {
        self.irqmp.advance_to(until);
    }

    /// Moves time forward by `cycles` clock cycles.
    pub fn run_cycles(&mut self, cycles: u64) {
        let until = self
            .now()
            .after_cycles(cycles, self.irqmp.config().clock_period_ps);
        self.advance_to(until);
    }

    /// Runs every queued evaluation and returns the resulting time.
    pub fn settle(&mut self) -> Timestamp {
        self.irqmp.settle()
    }

    /// Drives interrupt input `line` at the current time.
    ///
    /// # Errors
    ///
    /// Propagates line validation errors.
    pub fn assert_line(&mut self, line: u32, value: bool) -> Result<()> {
        let now = self.now();
        self.irqmp.assert_line(line, value, now)
    }

    /// Acknowledges `irq` on behalf of CPU `cpu` at the current time.
    ///
    /// # Errors
    ///
    /// Propagates line and CPU validation errors.
    pub fn ack(&mut self, irq: u32, cpu: usize) -> Result<()> {
        let now = self.now();
        self.irqmp.ack_irq(irq, cpu, now)
    }

    fn window_offset(&self, addr: u64) -> Option<u64> {
        let (base, size) = self.irqmp.address_range();
        (addr >= base && addr - base < size).then(|| addr - base)
    }

    /// Reads the register at absolute bus address `addr`; addresses outside the window read 0.
    pub fn bus_read(&mut self, addr: u64) -> u32 {
        match self.window_offset(addr) {
            Some(offset) => self.irqmp.read_u32(offset & !3),
            None => {
                warn!(addr = format_args!("{addr:#010x}"), "read outside the IRQMP window");
                0
            }
        }
    }

    /// Writes the register at absolute bus address `addr`; addresses outside the window are dropped.
    pub fn bus_write(&mut self, addr: u64, value: u32, byte_enable: u8) {
        match self.window_offset(addr) {
            Some(offset) => self.irqmp.write(offset & !3, value, byte_enable),
            None => {
                warn!(addr = format_args!("{addr:#010x}"), "write outside the IRQMP window");
            }
        }
    }

    /// Activity counters of the controller.
    pub fn report(&self) -> &IrqmpStats {
        self.irqmp.stats()
    }
}
