//! # Configuration Tests
//!
//! Defaults, JSON deserialization, validation, and the derived address window.

use std::io::Write;

use irqmp_core::IrqmpError;
use irqmp_core::config::{IrqmpConfig, MAX_CPUS};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = IrqmpConfig::default();
    assert_eq!(config.paddr, 0x002);
    assert_eq!(config.pmask, 0xFFF);
    assert_eq!(config.ncpu, 1);
    assert_eq!(config.eirq, 0);
    assert_eq!(config.pindex, 2);
    assert_eq!(config.clock_period_ps, 10_000);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_takes_defaults() {
    let config = IrqmpConfig::from_json_str(r#"{ "ncpu": 4, "eirq": 12 }"#).unwrap();
    assert_eq!(
        config,
        IrqmpConfig {
            ncpu: 4,
            eirq: 12,
            ..IrqmpConfig::default()
        }
    );
}

#[test]
fn test_empty_json_is_default() {
    assert_eq!(
        IrqmpConfig::from_json_str("{}").unwrap(),
        IrqmpConfig::default()
    );
}

#[test]
fn test_unknown_field_rejected() {
    let err = IrqmpConfig::from_json_str(r#"{ "ncpus": 2 }"#).unwrap_err();
    assert!(matches!(err, IrqmpError::Config(_)));
}

#[test]
fn test_json_is_validated() {
    let err = IrqmpConfig::from_json_str(r#"{ "ncpu": 0 }"#).unwrap_err();
    assert!(matches!(err, IrqmpError::CpuCountOutOfRange(0)));
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(MAX_CPUS)]
fn test_cpu_count_in_range(#[case] ncpu: usize) {
    let config = IrqmpConfig {
        ncpu,
        ..IrqmpConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[rstest]
#[case(0)]
#[case(17)]
#[case(64)]
fn test_cpu_count_out_of_range(#[case] ncpu: usize) {
    let config = IrqmpConfig {
        ncpu,
        ..IrqmpConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(IrqmpError::CpuCountOutOfRange(n)) if n == ncpu
    ));
}

#[rstest]
#[case(0, true)]
#[case(1, true)]
#[case(15, true)]
#[case(16, false)]
#[case(31, false)]
fn test_eirq_range(#[case] eirq: u32, #[case] ok: bool) {
    let config = IrqmpConfig {
        eirq,
        ..IrqmpConfig::default()
    };
    assert_eq!(config.validate().is_ok(), ok);
}

#[test]
fn test_zero_clock_period_rejected() {
    let config = IrqmpConfig {
        clock_period_ps: 0,
        ..IrqmpConfig::default()
    };
    assert!(matches!(config.validate(), Err(IrqmpError::ZeroClockPeriod)));
}

#[rstest]
#[case(0x002, 0xFFF, 0x200, 0x100)]
#[case(0x020, 0xFF0, 0x2000, 0x1000)]
#[case(0x800, 0xF00, 0x80000, 0x10000)]
fn test_address_window(
    #[case] paddr: u32,
    #[case] pmask: u32,
    #[case] base: u64,
    #[case] size: u64,
) {
    let config = IrqmpConfig {
        paddr,
        pmask,
        ..IrqmpConfig::default()
    };
    assert_eq!(config.address_window(), (base, size));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "ncpu": 2, "pindex": 7, "clock_period_ps": 5000 }}"#).unwrap();

    let config = IrqmpConfig::from_file(file.path()).unwrap();
    assert_eq!(config.ncpu, 2);
    assert_eq!(config.pindex, 7);
    assert_eq!(config.clock_period_ps, 5000);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = IrqmpConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, IrqmpError::Io(_)));
}
