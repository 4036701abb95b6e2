use irqmp_core::common::CpuId;
use irqmp_core::soc::devices::Device;
use irqmp_core::soc::devices::irqmp::RegisterId;
use irqmp_core::{Irqmp, IrqmpConfig, Simulator};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Returns a configuration for `ncpu` processors and extended line `eirq`.
pub fn config(ncpu: usize, eirq: u32) -> IrqmpConfig {
    IrqmpConfig {
        ncpu,
        eirq,
        ..IrqmpConfig::default()
    }
}

#[derive(Debug)]
pub struct TestContext {
    pub sim: Simulator,
}

impl TestContext {
    pub fn new(ncpu: usize, eirq: u32) -> Self {
        Self::with_config(&config(ncpu, eirq))
    }

    pub fn with_config(config: &IrqmpConfig) -> Self {
        init_tracing();
        let sim = Simulator::from_config(config).unwrap();
        Self { sim }
    }

    /// Convenience accessor for the controller.
    pub fn irqmp(&self) -> &Irqmp {
        &self.sim.irqmp
    }

    /// Mutable convenience accessor for the controller.
    pub fn irqmp_mut(&mut self) -> &mut Irqmp {
        &mut self.sim.irqmp
    }

    pub fn cpu(&self, index: usize) -> CpuId {
        self.irqmp().cpu(index).unwrap()
    }

    /// Raw register value (no read hooks).
    pub fn reg(&self, id: RegisterId) -> u32 {
        self.irqmp().register(id)
    }

    /// Register read through the bus interface.
    pub fn read(&mut self, id: RegisterId) -> u32 {
        self.irqmp_mut().read_u32(id.offset())
    }

    /// Full-width register write through the bus interface.
    pub fn write(&mut self, id: RegisterId, value: u32) {
        self.irqmp_mut().write_u32(id.offset(), value);
    }

    /// Asserts `line` at the current time.
    pub fn raise(&mut self, line: u32) {
        self.sim.assert_line(line, true).unwrap();
    }

    pub fn ack(&mut self, irq: u32, cpu: usize) {
        self.sim.ack(irq, cpu).unwrap();
    }

    /// Runs every queued arbitration.
    pub fn settle(&mut self) {
        let _ = self.sim.settle();
    }

    pub fn request(&self, cpu: usize) -> Option<u8> {
        self.irqmp().cpu_request(self.cpu(cpu))
    }

    /// Request transitions seen on `cpu`'s port, oldest first.
    pub fn history(&self, cpu: usize) -> Vec<Option<u8>> {
        self.irqmp().ports().irq_history(cpu)
    }

    pub fn set_running(&mut self, cpu: usize, running: bool) {
        self.irqmp_mut().ports_mut().set_running(cpu, running);
    }
}
