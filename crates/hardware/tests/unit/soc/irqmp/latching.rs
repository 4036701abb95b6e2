//! Hardware line latching and broadcast routing.

use irqmp_core::IrqmpError;
use irqmp_core::soc::devices::irqmp::RegisterId;
use rstest::rstest;

use crate::common::harness::TestContext;

#[test]
fn deasserting_edge_changes_nothing() {
    let mut ctx = TestContext::new(2, 0);
    let before: Vec<u32> = ctx.irqmp().registers().map(|(_, v)| v).collect();

    ctx.sim.assert_line(3, false).unwrap();

    let after: Vec<u32> = ctx.irqmp().registers().map(|(_, v)| v).collect();
    assert_eq!(before, after);
    assert!(ctx.irqmp().scheduler().is_empty());
}

#[test]
fn assertion_latches_into_pending() {
    let mut ctx = TestContext::new(1, 0);
    ctx.raise(3);
    ctx.sim.assert_line(3, false).unwrap();

    assert_eq!(ctx.reg(RegisterId::Pending), 1 << 3);
    ctx.settle();
    assert_eq!(ctx.request(0), Some(3));
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(15)]
fn broadcast_line_forces_every_cpu(#[case] line: u32) {
    let mut ctx = TestContext::new(3, 0);
    ctx.write(RegisterId::Broadcast, 1 << line);
    ctx.raise(line);

    assert_eq!(ctx.reg(RegisterId::Pending), 0);
    for i in 0..3 {
        let cpu = ctx.cpu(i);
        assert_eq!(ctx.reg(RegisterId::CpuForce(cpu)), 1 << line);
        assert_eq!(ctx.irqmp().force_shadow(cpu), 1 << line);
    }
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(15)]
fn non_broadcast_line_leaves_force_alone(#[case] line: u32) {
    let mut ctx = TestContext::new(3, 0);
    ctx.raise(line);

    assert_eq!(ctx.reg(RegisterId::Pending), 1 << line);
    for i in 0..3 {
        let cpu = ctx.cpu(i);
        assert_eq!(ctx.reg(RegisterId::CpuForce(cpu)), 0);
    }
}

#[test]
fn extended_lines_cannot_be_broadcast() {
    let mut ctx = TestContext::new(2, 0);
    ctx.write(RegisterId::Broadcast, 0xFFFF_FFFF);
    assert_eq!(ctx.reg(RegisterId::Broadcast), 0xFFFE);

    ctx.raise(20);
    assert_eq!(ctx.reg(RegisterId::Pending), 1 << 20);
}

#[test]
fn invalid_lines_rejected() {
    let mut ctx = TestContext::new(1, 0);
    assert!(matches!(
        ctx.sim.assert_line(0, true),
        Err(IrqmpError::ReservedLine(0))
    ));
    assert!(matches!(
        ctx.sim.assert_line(32, true),
        Err(IrqmpError::InvalidLine(32))
    ));
    assert_eq!(ctx.reg(RegisterId::Pending), 0);
    assert!(ctx.irqmp().scheduler().is_empty());
}
