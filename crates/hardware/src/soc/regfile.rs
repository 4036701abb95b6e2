//! Memory-mapped register file.
//!
//! A small register container used by MMIO device models. It provides:
//! 1. **Creation:** Named 32-bit registers at fixed offsets, each with a reset value and write mask.
//! 2. **Typed lookup:** Registers are addressed either by bus offset or by a device-defined key.
//! 3. **Access paths:** Bus writes honour byte enables and the write mask; hardware writes do not.
//! 4. **Hooks:** Each register carries a device-defined hook value the owner dispatches on
//!    after a write or before a read.

use std::collections::HashMap;
use std::hash::Hash;

use crate::common::{IrqmpError, Result};

/// All four byte lanes of a 32-bit access enabled.
pub const ALL_BYTES: u8 = 0b1111;

/// Static description of one register.
#[derive(Clone, Debug)]
pub struct RegisterDescriptor<K, H> {
    /// Device-defined identity of the register.
    pub key: K,
    /// Short unique name, e.g. `"pending"` or `"mask_1"`.
    pub name: String,
    /// Human-readable description.
    pub description: &'static str,
    /// Byte offset inside the device window.
    pub offset: u64,
    /// Value loaded on reset.
    pub reset: u32,
    /// Bits a bus write may change; the others keep their value.
    pub write_mask: u32,
    /// Device-defined action attached to the register.
    pub hook: H,
}

#[derive(Clone, Debug)]
struct Slot<K, H> {
    desc: RegisterDescriptor<K, H>,
    value: u32,
}

/// A set of 32-bit registers addressable by offset and by key.
#[derive(Clone, Debug)]
pub struct RegisterFile<K, H> {
    slots: Vec<Slot<K, H>>,
    by_offset: HashMap<u64, usize>,
    by_key: HashMap<K, usize>,
}

/// Expands a 4-bit byte-enable into a 32-bit lane mask.
#[inline]
pub fn lane_mask(byte_enable: u8) -> u32 {
    (0..4)
        .filter(|lane| byte_enable & (1 << lane) != 0)
        .fold(0, |mask, lane| mask | (0xFF << (lane * 8)))
}

impl<K, H> RegisterFile<K, H>
where
    K: Copy + Eq + Hash,
    H: Copy,
{
    /// Creates an empty register file.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            by_offset: HashMap::new(),
            by_key: HashMap::new(),
        }
    }

    /// Adds a register, initialised to its reset value.
    ///
    /// # Errors
    ///
    /// Returns [`IrqmpError::DuplicateRegister`] if the offset or key is already taken.
    pub fn create_register(&mut self, desc: RegisterDescriptor<K, H>) -> Result<()> {
        if self.by_offset.contains_key(&desc.offset) || self.by_key.contains_key(&desc.key) {
            return Err(IrqmpError::DuplicateRegister(desc.offset));
        }
        let idx = self.slots.len();
        let _ = self.by_offset.insert(desc.offset, idx);
        let _ = self.by_key.insert(desc.key, idx);
        let value = desc.reset;
        self.slots.push(Slot { desc, value });
        Ok(())
    }

    /// Resolves a bus offset to a register key.
    pub fn lookup(&self, offset: u64) -> Option<K> {
        self.by_offset
            .get(&offset)
            .map(|&idx| self.slots[idx].desc.key)
    }

    fn slot(&self, key: K) -> Option<&Slot<K, H>> {
        self.by_key.get(&key).map(|&idx| &self.slots[idx])
    }

    fn slot_mut(&mut self, key: K) -> Option<&mut Slot<K, H>> {
        self.by_key.get(&key).map(|&idx| &mut self.slots[idx])
    }

    /// Returns the current value of a register; unknown keys read as zero.
    #[inline]
    pub fn get(&self, key: K) -> u32 {
        self.slot(key).map_or(0, |s| s.value)
    }

    /// Stores a value without applying the write mask (hardware path).
    #[inline]
    pub fn set(&mut self, key: K, value: u32) {
        if let Some(slot) = self.slot_mut(key) {
            slot.value = value;
        }
    }

    /// Returns bit `bit` of a register.
    #[inline]
    pub fn bit(&self, key: K, bit: u32) -> bool {
        self.get(key) & (1 << bit) != 0
    }

    /// Sets or clears bit `bit` of a register (hardware path).
    #[inline]
    pub fn set_bit(&mut self, key: K, bit: u32, on: bool) {
        if let Some(slot) = self.slot_mut(key) {
            if on {
                slot.value |= 1 << bit;
            } else {
                slot.value &= !(1 << bit);
            }
        }
    }

    /// Performs a bus write: merges the enabled byte lanes, then keeps every bit
    /// outside the write mask at its previous value.
    ///
    /// Returns the register's new value, or `None` for an unknown key.
    pub fn bus_write(&mut self, key: K, value: u32, byte_enable: u8) -> Option<u32> {
        let slot = self.slot_mut(key)?;
        let writable = lane_mask(byte_enable) & slot.desc.write_mask;
        slot.value = (slot.value & !writable) | (value & writable);
        Some(slot.value)
    }

    /// Returns the hook attached to a register.
    pub fn hook(&self, key: K) -> Option<H> {
        self.slot(key).map(|s| s.desc.hook)
    }

    /// Returns the descriptor of a register.
    pub fn descriptor(&self, key: K) -> Option<&RegisterDescriptor<K, H>> {
        self.slot(key).map(|s| &s.desc)
    }

    /// Restores every register to its reset value.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.value = slot.desc.reset;
        }
    }

    /// Number of registers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no register has been created.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates `(descriptor, value)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&RegisterDescriptor<K, H>, u32)> {
        self.slots.iter().map(|s| (&s.desc, s.value))
    }
}

impl<K, H> Default for RegisterFile<K, H>
where
    K: Copy + Eq + Hash,
    H: Copy,
{
    fn default() -> Self {
        Self::new()
    }
}
