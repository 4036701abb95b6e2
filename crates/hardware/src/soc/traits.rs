//! Device trait for memory-mapped register access.
//!
//! This module defines the `Device` trait implemented by bus-attached register models. It provides:
//! 1. **Identification:** `name` and `address_range` for bus routing.
//! 2. **Access:** Byte-enabled word writes plus byte, half, word, and doubleword accessors at
//!    device-relative offsets.
//! 3. **Lifecycle:** A `reset` entry point that restores documented register defaults.

use crate::soc::regfile::ALL_BYTES;

/// Trait for memory-mapped devices attached to a register bus.
///
/// Implementors provide word reads and byte-enabled word writes; the narrower and wider
/// accessors have default implementations that split or merge into word accesses using
/// little-endian byte lanes.
pub trait Device {
    /// Returns a short name for this device (e.g., `"IRQMP"`).
    fn name(&self) -> &str;
    /// Returns `(base_address, size_in_bytes)` of this device's register window.
    fn address_range(&self) -> (u64, u64);
    /// Reads the 32-bit register at `offset`.
    fn read_u32(&mut self, offset: u64) -> u32;
    /// Writes the byte lanes of `val` selected by `byte_enable` to the register at `offset`.
    fn write(&mut self, offset: u64, val: u32, byte_enable: u8);
    /// Restores the device's reset state.
    fn reset(&mut self);

    /// Writes a full 32-bit register.
    fn write_u32(&mut self, offset: u64, val: u32) {
        self.write(offset & !3, val, ALL_BYTES);
    }

    /// Reads a byte (delegates to `read_u32`).
    fn read_u8(&mut self, offset: u64) -> u8 {
        (self.read_u32(offset & !3) >> ((offset & 3) * 8)) as u8
    }
    /// Reads a half-word (delegates to `read_u32`).
    fn read_u16(&mut self, offset: u64) -> u16 {
        (self.read_u32(offset & !3) >> ((offset & 2) * 8)) as u16
    }
    /// Reads a double-word as two consecutive registers.
    fn read_u64(&mut self, offset: u64) -> u64 {
        let lo = self.read_u32(offset & !7);
        let hi = self.read_u32((offset & !7) + 4);
        (u64::from(hi) << 32) | u64::from(lo)
    }

    /// Writes a byte into its lane of the enclosing register.
    fn write_u8(&mut self, offset: u64, val: u8) {
        let lane = offset & 3;
        self.write(offset & !3, u32::from(val) << (lane * 8), 1 << lane);
    }
    /// Writes a half-word into its lanes of the enclosing register.
    fn write_u16(&mut self, offset: u64, val: u16) {
        let lane = offset & 2;
        self.write(offset & !3, u32::from(val) << (lane * 8), 0b11 << lane);
    }
    /// Writes a double-word as two consecutive registers.
    fn write_u64(&mut self, offset: u64, val: u64) {
        self.write_u32(offset & !7, val as u32);
        self.write_u32((offset & !7) + 4, (val >> 32) as u32);
    }
}
