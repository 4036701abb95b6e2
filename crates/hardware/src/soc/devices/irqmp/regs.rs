//! IRQMP register map.
//!
//! Offsets, write masks, reset values, and the hook attached to each register.
//!
//! # Memory Map
//!
//! * `0x00`: Interrupt Level
//! * `0x04`: Interrupt Pending
//! * `0x08`: Interrupt Force (global)
//! * `0x0C`: Interrupt Clear
//! * `0x10`: Multiprocessor Status
//! * `0x14`: Broadcast
//! * `0x40 + 4c`: Interrupt Mask, CPU c
//! * `0x80 + 4c`: Interrupt Force / Force Clear, CPU c
//! * `0xC0 + 4c`: Extended Interrupt Identification, CPU c

use crate::common::{CpuId, Result};
use crate::soc::regfile::{RegisterDescriptor, RegisterFile};

/// Offset of the interrupt level register.
pub const LEVEL_OFFSET: u64 = 0x00;
/// Offset of the interrupt pending register.
pub const PENDING_OFFSET: u64 = 0x04;
/// Offset of the global interrupt force register.
pub const FORCE_OFFSET: u64 = 0x08;
/// Offset of the interrupt clear register.
pub const CLEAR_OFFSET: u64 = 0x0C;
/// Offset of the multiprocessor status register.
pub const MPSTAT_OFFSET: u64 = 0x10;
/// Offset of the broadcast register.
pub const BROADCAST_OFFSET: u64 = 0x14;
/// Base offset of the per-CPU mask registers.
pub const MASK_BASE: u64 = 0x40;
/// Base offset of the per-CPU force registers.
pub const CPU_FORCE_BASE: u64 = 0x80;
/// Base offset of the per-CPU extended interrupt id registers.
pub const EXTID_BASE: u64 = 0xC0;

/// Level register: one priority bit per ordinary line.
pub const IR_LEVEL_IL: u32 = 0x0000_FFFE;
/// Pending register: extended pending bits.
pub const IR_PENDING_EIP: u32 = 0xFFFE_0000;
/// Pending register: ordinary pending bits.
pub const IR_PENDING_IP: u32 = 0x0000_FFFE;
/// Force register: forceable lines.
pub const IR_FORCE_IF: u32 = 0x0000_FFFE;
/// Clear register: clearable lines.
pub const IR_CLEAR_IC: u32 = 0xFFFF_FFFE;
/// MPSTAT: writable CPU status bits.
pub const MP_STAT_STATUS: u32 = 0x0000_FFFF;
/// Broadcast register: broadcastable lines.
pub const BROADCAST_BM: u32 = 0x0000_FFFE;
/// Mask register: extended interrupt mask bits.
pub const PROC_MASK_EIM: u32 = 0xFFFE_0000;
/// Mask register: ordinary interrupt mask bits.
pub const PROC_MASK_IM: u32 = 0x0000_FFFE;
/// Per-CPU force register: force-clear (IFC) bits.
pub const PROC_IR_FORCE_IFC: u32 = 0xFFFE_0000;
/// Per-CPU force register: force bits.
pub const PROC_IR_FORCE_IF: u32 = 0x0000_FFFE;
/// Extended interrupt id register: id field.
pub const PROC_EXTIR_ID_EID: u32 = 0x0000_001F;

/// Reset value of the per-CPU mask registers: every line but 0 unmasked.
pub const MASK_DEFAULT: u32 = 0xFFFF_FFFE;

/// Reset value of MPSTAT for a controller with `ncpu` CPUs and EIRQ line `eirq`.
///
/// The NCPU field is four bits wide, so a 16-CPU controller encodes as 0.
pub const fn mpstat_default(ncpu: usize, eirq: u32) -> u32 {
    0xFFFE | mpstat_geometry(ncpu, eirq)
}

/// The read-only NCPU and EIRQ fields of MPSTAT.
pub const fn mpstat_geometry(ncpu: usize, eirq: u32) -> u32 {
    ((ncpu as u32 & 0xF) << 28) | ((eirq & 0xF) << 16)
}

/// Identity of one IRQMP register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegisterId {
    /// Interrupt level.
    Level,
    /// Interrupt pending.
    Pending,
    /// Global interrupt force.
    Force,
    /// Interrupt clear.
    Clear,
    /// Multiprocessor status.
    MpStat,
    /// Broadcast.
    Broadcast,
    /// Interrupt mask of one CPU.
    Mask(CpuId),
    /// Interrupt force of one CPU.
    CpuForce(CpuId),
    /// Extended interrupt id of one CPU.
    ExtId(CpuId),
}

impl RegisterId {
    /// Bus offset of the register.
    pub const fn offset(self) -> u64 {
        match self {
            Self::Level => LEVEL_OFFSET,
            Self::Pending => PENDING_OFFSET,
            Self::Force => FORCE_OFFSET,
            Self::Clear => CLEAR_OFFSET,
            Self::MpStat => MPSTAT_OFFSET,
            Self::Broadcast => BROADCAST_OFFSET,
            Self::Mask(cpu) => MASK_BASE + 4 * cpu.index() as u64,
            Self::CpuForce(cpu) => CPU_FORCE_BASE + 4 * cpu.index() as u64,
            Self::ExtId(cpu) => EXTID_BASE + 4 * cpu.index() as u64,
        }
    }
}

/// Action the controller takes around an access to a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    /// Plain storage.
    Store,
    /// Re-run arbitration after one clock cycle.
    Reschedule,
    /// Clear pending and forced lines.
    Clear,
    /// Merge a per-CPU force write into the force shadow.
    CpuForce(CpuId),
    /// Reset running CPUs on write; regenerate from live CPU status on read.
    MpStat,
}

fn reg(
    key: RegisterId,
    name: String,
    description: &'static str,
    reset: u32,
    write_mask: u32,
    hook: Hook,
) -> RegisterDescriptor<RegisterId, Hook> {
    RegisterDescriptor {
        key,
        name,
        description,
        offset: key.offset(),
        reset,
        write_mask,
        hook,
    }
}

/// Builds the register file for a controller with `ncpu` CPUs and EIRQ line `eirq`.
///
/// # Errors
///
/// Fails only if two registers collide, which would indicate a broken map.
pub fn build_register_file(ncpu: usize, eirq: u32) -> Result<RegisterFile<RegisterId, Hook>> {
    let mut r = RegisterFile::new();
    r.create_register(reg(
        RegisterId::Level,
        "level".into(),
        "Interrupt Level Register",
        0,
        IR_LEVEL_IL,
        Hook::Store,
    ))?;
    r.create_register(reg(
        RegisterId::Pending,
        "pending".into(),
        "Interrupt Pending Register",
        0,
        IR_PENDING_EIP | IR_PENDING_IP,
        Hook::Reschedule,
    ))?;
    r.create_register(reg(
        RegisterId::Force,
        "force".into(),
        "Interrupt Force Register",
        0,
        IR_FORCE_IF,
        Hook::Reschedule,
    ))?;
    r.create_register(reg(
        RegisterId::Clear,
        "clear".into(),
        "Interrupt Clear Register",
        0,
        IR_CLEAR_IC,
        Hook::Clear,
    ))?;
    r.create_register(reg(
        RegisterId::MpStat,
        "mpstat".into(),
        "Multiprocessor Status Register",
        mpstat_default(ncpu, eirq),
        MP_STAT_STATUS,
        Hook::MpStat,
    ))?;
    r.create_register(reg(
        RegisterId::Broadcast,
        "broadcast".into(),
        "Interrupt Broadcast Register",
        0,
        BROADCAST_BM,
        Hook::Store,
    ))?;

    for cpu in CpuId::ascending(ncpu) {
        let i = cpu.index();
        r.create_register(reg(
            RegisterId::Mask(cpu),
            format!("mask_{i}"),
            "Interrupt Mask Register",
            MASK_DEFAULT,
            PROC_MASK_EIM | PROC_MASK_IM,
            Hook::Reschedule,
        ))?;
        r.create_register(reg(
            RegisterId::CpuForce(cpu),
            format!("force_{i}"),
            "Interrupt Force Register",
            0,
            PROC_IR_FORCE_IFC | PROC_IR_FORCE_IF,
            Hook::CpuForce(cpu),
        ))?;
        r.create_register(reg(
            RegisterId::ExtId(cpu),
            format!("eir_id_{i}"),
            "Extended Interrupt Identification Register",
            0,
            PROC_EXTIR_ID_EID,
            Hook::Store,
        ))?;
    }
    Ok(r)
}
