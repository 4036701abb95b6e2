//! Interrupt activity statistics collection and reporting.
//!
//! This module tracks diagnostic counters for the interrupt controller. It provides:
//! 1. **Line activity:** How often each of the 32 input lines was asserted.
//! 2. **CPU activity:** How many requests were actually delivered to each processor.
//! 3. **Reporting:** A human-readable end-of-simulation report and a JSON form.
//!
//! Counters are monotonic for the lifetime of the controller; a controller reset does not clear them.

use std::fmt;

use serde::Serialize;

use crate::common::{CpuId, IrqLine, NUM_LINES};

/// Per-line and per-CPU interrupt activity counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IrqmpStats {
    /// Label printed in the report header (usually the device name).
    #[serde(skip)]
    label: String,
    /// Assertions seen on each input line.
    pub irq_lines: [u64; NUM_LINES as usize],
    /// Requests delivered to each CPU.
    pub cpu_lines: Vec<u64>,
}

impl IrqmpStats {
    /// Creates zeroed counters for a controller serving `ncpu` processors.
    pub fn new(label: impl Into<String>, ncpu: usize) -> Self {
        Self {
            label: label.into(),
            irq_lines: [0; NUM_LINES as usize],
            cpu_lines: vec![0; ncpu],
        }
    }

    /// Counts one assertion of `line`.
    #[inline]
    pub fn record_line(&mut self, line: IrqLine) {
        self.irq_lines[line.number() as usize] += 1;
    }

    /// Counts one request delivered to `cpu`.
    #[inline]
    pub fn record_delivery(&mut self, cpu: CpuId) {
        self.cpu_lines[cpu.index()] += 1;
    }

    /// Returns the assertion count of `line`.
    pub fn line(&self, line: IrqLine) -> u64 {
        self.irq_lines[line.number() as usize]
    }

    /// Returns the delivery count of `cpu`.
    pub fn cpu(&self, cpu: CpuId) -> u64 {
        self.cpu_lines[cpu.index()]
    }

    /// Sum of assertions over the usable lines 1..=31.
    pub fn line_total(&self) -> u64 {
        self.irq_lines[1..].iter().sum()
    }

    /// Sum of deliveries over all CPUs.
    pub fn cpu_total(&self) -> u64 {
        self.cpu_lines.iter().sum()
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

impl fmt::Display for IrqmpStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.label;
        writeln!(f, "{name} ********************************************")?;
        writeln!(f, "{name} * IRQMP statistic:")?;
        writeln!(f, "{name} * ================")?;
        for (line, count) in self.irq_lines.iter().enumerate().skip(1) {
            writeln!(f, "{name} * + IRQ Line {line:<2}:    {count}")?;
        }
        writeln!(f, "{name} * --------------------------------------")?;
        writeln!(f, "{name} * = Sum        :    {}", self.line_total())?;
        writeln!(f, "{name} *")?;
        for (cpu, count) in self.cpu_lines.iter().enumerate() {
            writeln!(f, "{name} * + CPU Line {cpu:<2}:    {count}")?;
        }
        writeln!(f, "{name} * --------------------------------------")?;
        writeln!(f, "{name} * = Sum        :    {}", self.cpu_total())?;
        writeln!(f, "{name} ********************************************")
    }
}
