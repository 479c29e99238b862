//! Integration tests for the PMU register decoder.

use proptest::prelude::*;
use rstest::rstest;
use soc_pmu::config::PmuConfig;
use soc_pmu::pmu::{DomainId, Register, RegisterMap, TransitionKind};

fn default_map() -> RegisterMap {
    RegisterMap::new(&PmuConfig::default(), 4)
}

/// Tests decoding of the first slot of every register group.
#[rstest]
#[case(0x0000, Some(Register::State(DomainId::new(0))))]
#[case(0x000C, Some(Register::State(DomainId::new(3))))]
#[case(0x1004, Some(Register::Voltage(DomainId::new(1))))]
#[case(0x2000, Some(Register::Capture))]
#[case(0x3000, Some(Register::Delay(DomainId::new(0), TransitionKind::OnToOff)))]
#[case(0x3014, Some(Register::Delay(DomainId::new(1), TransitionKind::OffToOn)))]
#[case(0x3038, Some(Register::Delay(DomainId::new(3), TransitionKind::OnToClockGated)))]
#[case(0x303C, Some(Register::Delay(DomainId::new(3), TransitionKind::ClockGatedToOn)))]
fn test_decode_mapped_offsets(#[case] offset: u64, #[case] expected: Option<Register>) {
    assert_eq!(default_map().decode(offset), expected);
}

/// Tests that offsets outside every register decode to nothing.
#[rstest]
#[case(0x0010)]
#[case(0x0001)]
#[case(0x0FFC)]
#[case(0x1010)]
#[case(0x2010)]
#[case(0x3040)]
#[case(0x3002)]
#[case(0x4000)]
#[case(u64::MAX)]
fn test_decode_unmapped_offsets(#[case] offset: u64) {
    assert_eq!(default_map().decode(offset), None);
}

/// Tests that the domain count bounds the decoded strides.
#[test]
fn test_decode_respects_domain_count() {
    let map = RegisterMap::new(&PmuConfig::default(), 1);
    assert_eq!(map.decode(0x0000), Some(Register::State(DomainId::new(0))));
    assert_eq!(map.decode(0x0004), None);
    assert_eq!(map.decode(0x3010), None);
}

/// Tests decoding with a relocated register layout.
#[test]
fn test_decode_custom_layout() {
    let config = PmuConfig {
        state_offset: 0x100,
        voltage_offset: 0x200,
        capture_offset: 0x300,
        delay_offset: 0x400,
        group_size: 0x100,
        capture_size: 0x8,
        state_stride: 8,
        voltage_stride: 8,
        delay_stride: 32,
        ..PmuConfig::default()
    };
    let map = RegisterMap::new(&config, 2);

    assert_eq!(map.decode(0x108), Some(Register::State(DomainId::new(1))));
    assert_eq!(map.decode(0x104), None);
    assert_eq!(map.decode(0x304), Some(Register::Capture));
    assert_eq!(
        map.decode(0x430),
        Some(Register::Delay(DomainId::new(1), TransitionKind::OnToClockGated))
    );
    assert_eq!(map.decode(0x000), None);
}

proptest! {
    /// Tests that every register's offset decodes back to the register.
    #[test]
    fn test_offset_of_inverts_decode(domain in 0usize..4, slot in 0usize..4, group in 0u8..4) {
        let map = default_map();
        let id = DomainId::new(domain);
        let register = match group {
            0 => Register::State(id),
            1 => Register::Voltage(id),
            2 => Register::Capture,
            _ => Register::Delay(id, TransitionKind::ALL[slot]),
        };
        prop_assert_eq!(map.decode(map.offset_of(register)), Some(register));
    }

    /// Tests that decoding never panics.
    #[test]
    fn test_decode_total(offset in any::<u64>()) {
        let _ = default_map().decode(offset);
    }
}
