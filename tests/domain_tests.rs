//! Integration tests for power states, transitions and delay tables.

use proptest::prelude::*;
use rstest::rstest;
use soc_pmu::pmu::{DelayTable, PowerState, TransitionKind};

/// Tests decoding of the 2-bit state codes.
#[rstest]
#[case(0, PowerState::Off)]
#[case(1, PowerState::ClockGated)]
#[case(2, PowerState::Off)]
#[case(3, PowerState::On)]
#[case(0x7, PowerState::On)]
fn test_state_from_code(#[case] code: u64, #[case] expected: PowerState) {
    assert_eq!(PowerState::from_code(code), expected);
}

/// Tests the canonical codes and trace names.
#[test]
fn test_state_code_and_name() {
    assert_eq!(PowerState::Off.code(), 0);
    assert_eq!(PowerState::ClockGated.code(), 1);
    assert_eq!(PowerState::On.code(), 3);
    assert_eq!(PowerState::ClockGated.to_string(), "ON CLOCK GATED");
    assert_eq!(format!("{}", PowerState::On), "ON");
}

/// Tests which delay governs each request.
#[rstest]
#[case(PowerState::Off, PowerState::On, TransitionKind::OffToOn)]
#[case(PowerState::ClockGated, PowerState::On, TransitionKind::ClockGatedToOn)]
#[case(PowerState::On, PowerState::On, TransitionKind::ClockGatedToOn)]
#[case(PowerState::On, PowerState::Off, TransitionKind::OnToOff)]
#[case(PowerState::Off, PowerState::Off, TransitionKind::OnToOff)]
#[case(PowerState::On, PowerState::ClockGated, TransitionKind::OnToClockGated)]
#[case(PowerState::Off, PowerState::ClockGated, TransitionKind::OnToClockGated)]
fn test_transition_for_request(
    #[case] current: PowerState,
    #[case] target: PowerState,
    #[case] expected: TransitionKind,
) {
    assert_eq!(TransitionKind::for_request(current, target), expected);
}

/// Tests the delay table index order.
#[test]
fn test_delay_table_order() {
    let mut table = DelayTable::new([10, 20, 30, 40]);
    assert_eq!(table.get(TransitionKind::OnToOff), 10);
    assert_eq!(table.get(TransitionKind::OffToOn), 20);
    assert_eq!(table.get(TransitionKind::OnToClockGated), 30);
    assert_eq!(table.get(TransitionKind::ClockGatedToOn), 40);

    table.set(TransitionKind::OnToClockGated, 5);
    assert_eq!(table.as_array(), [10, 20, 5, 40]);
    assert_eq!(table.to_string(), "on-off: 10, off-on: 20, on-cg: 5, cg-on: 40");
}

proptest! {
    /// Tests that every code decodes to a state whose code decodes back to it.
    #[test]
    fn test_code_is_stable(code in any::<u64>()) {
        let state = PowerState::from_code(code);
        prop_assert_eq!(PowerState::from_code(state.code()), state);
    }

    /// Tests that kinds and indices are inverse.
    #[test]
    fn test_kind_index_roundtrip(index in 0usize..8) {
        match TransitionKind::from_index(index) {
            Some(kind) => prop_assert_eq!(kind.index(), index),
            None => prop_assert!(index >= 4),
        }
    }
}
