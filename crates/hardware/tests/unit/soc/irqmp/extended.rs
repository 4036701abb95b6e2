//! Extended interrupts (lines 16..31) and the extended id registers.

use irqmp_core::soc::devices::irqmp::RegisterId;

use crate::common::harness::TestContext;

const EIRQ: u32 = 10;

#[test]
fn extended_line_raises_aggregate() {
    let mut ctx = TestContext::new(1, EIRQ);
    let cpu = ctx.cpu(0);
    ctx.raise(20);
    assert_eq!(ctx.reg(RegisterId::Pending), 1 << 20);

    ctx.settle();
    assert_eq!(ctx.reg(RegisterId::Pending), (1 << 20) | (1 << EIRQ));
    assert_eq!(ctx.request(0), Some(EIRQ as u8));
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 20);
}

#[test]
fn ack_releases_recorded_extended_line() {
    let mut ctx = TestContext::new(1, EIRQ);
    let cpu = ctx.cpu(0);
    ctx.raise(20);
    ctx.settle();

    ctx.ack(EIRQ, 0);
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 0);
    assert_eq!(ctx.request(0), None);
    ctx.settle();
    assert_eq!(ctx.reg(RegisterId::Pending), 0);
    assert_eq!(ctx.history(0), vec![Some(EIRQ as u8), None]);
}

#[test]
fn extended_lines_are_served_highest_first() {
    let mut ctx = TestContext::new(1, EIRQ);
    let cpu = ctx.cpu(0);
    ctx.raise(20);
    ctx.raise(25);
    ctx.settle();
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 25);

    ctx.ack(EIRQ, 0);
    ctx.settle();
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 20);
    assert_eq!(ctx.request(0), Some(EIRQ as u8));
    assert_eq!(ctx.reg(RegisterId::Pending), (1 << 20) | (1 << EIRQ));
}

#[test]
fn masked_extended_line_is_inactive() {
    let mut ctx = TestContext::new(1, EIRQ);
    let cpu = ctx.cpu(0);
    ctx.write(RegisterId::Mask(cpu), 0xFFFE);
    ctx.raise(20);
    ctx.settle();

    assert_eq!(ctx.request(0), None);
    assert_eq!(ctx.reg(RegisterId::Pending), 1 << 20);
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 0);
}

#[test]
fn aggregate_competes_with_ordinary_lines() {
    let mut ctx = TestContext::new(1, EIRQ);
    ctx.raise(20);
    ctx.raise(12);
    ctx.settle();
    assert_eq!(ctx.request(0), Some(12));

    ctx.write(RegisterId::Level, 1 << EIRQ);
    ctx.raise(3);
    ctx.settle();
    assert_eq!(ctx.request(0), Some(EIRQ as u8));
}

#[test]
fn clear_write_releases_extended_ids() {
    let mut ctx = TestContext::new(2, EIRQ);
    ctx.raise(22);
    ctx.settle();
    for i in 0..2 {
        let cpu = ctx.cpu(i);
        assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 22);
    }

    ctx.write(RegisterId::Clear, 1 << EIRQ);
    for i in 0..2 {
        let cpu = ctx.cpu(i);
        assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 0);
        assert_eq!(ctx.request(i), None);
    }
    ctx.settle();
    assert_eq!(ctx.reg(RegisterId::Pending), 0);
}

#[test]
fn clear_of_extended_bit_deasserts_aggregate() {
    let mut ctx = TestContext::new(1, EIRQ);
    let cpu = ctx.cpu(0);
    let ext_mask = 0xFFFE_FFFE & !(1 << 20);
    ctx.write(RegisterId::Mask(cpu), ext_mask);
    ctx.raise(20);
    ctx.raise(21);
    ctx.settle();
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 21);

    ctx.write(RegisterId::Clear, (1 << 24) | (1 << EIRQ));
    assert_eq!(ctx.request(0), None);
    ctx.settle();
    // Line 21 was released through its id; line 20 is masked.
    assert_eq!(ctx.request(0), None);
    assert_eq!(ctx.reg(RegisterId::Pending), 1 << 20);
}

#[test]
fn stale_aggregate_bit_is_served_as_ordinary_line() {
    let mut ctx = TestContext::new(1, EIRQ);
    let cpu = ctx.cpu(0);
    ctx.raise(22);
    ctx.settle();

    // Releasing the id leaves the aggregate bit behind in pending.
    ctx.write(RegisterId::Clear, 0);
    assert_eq!(ctx.reg(RegisterId::Pending), 1 << EIRQ);
    ctx.settle();
    assert_eq!(ctx.request(0), Some(EIRQ as u8));
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 0);
    assert_eq!(ctx.reg(RegisterId::Pending), 0);
}

#[test]
fn pending_write_of_extended_slot_delivers() {
    let mut ctx = TestContext::new(1, EIRQ);
    let cpu = ctx.cpu(0);
    ctx.write(RegisterId::Pending, 1 << EIRQ);
    ctx.settle();

    assert_eq!(ctx.request(0), Some(EIRQ as u8));
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 0);
    // No extended line is active, so the evaluation drops the bit again.
    assert_eq!(ctx.reg(RegisterId::Pending), 0);
}

#[test]
fn asserting_extended_slot_line_delivers() {
    let mut ctx = TestContext::new(1, EIRQ);
    ctx.raise(EIRQ);
    assert_eq!(ctx.reg(RegisterId::Pending), 1 << EIRQ);
    ctx.settle();

    assert_eq!(ctx.request(0), Some(EIRQ as u8));
    assert_eq!(ctx.irqmp().stats().irq_lines[EIRQ as usize], 1);
    assert_eq!(ctx.irqmp().stats().cpu_lines, vec![1]);
}

#[test]
fn force_write_clears_recorded_extended_pending() {
    let mut ctx = TestContext::new(1, EIRQ);
    let cpu = ctx.cpu(0);
    ctx.raise(20);
    ctx.settle();
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 20);

    ctx.write(RegisterId::CpuForce(cpu), 0);
    assert_eq!(ctx.reg(RegisterId::Pending), 1 << EIRQ);
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 20);
    assert_eq!(ctx.request(0), Some(EIRQ as u8));
}

#[test]
fn extended_id_is_software_writable() {
    let mut ctx = TestContext::new(1, EIRQ);
    let cpu = ctx.cpu(0);
    ctx.write(RegisterId::ExtId(cpu), 0xFFFF_FFF3);
    assert_eq!(ctx.reg(RegisterId::ExtId(cpu)), 0x13);
}
