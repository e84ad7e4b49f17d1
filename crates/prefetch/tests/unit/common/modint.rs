//! Modular Index Tests.
//!
//! Verifies that `ModularIndex` wraps consistently in both directions, which
//! the delta history relies on when scanning backwards past slot zero.

use dcpt_core::common::ModularIndex;
use dcpt_core::common::NUM_DELTAS;
use dcpt_core::prefetch::DeltaIndex;
use proptest::prelude::*;

// ══════════════════════════════════════════════════════════
// 1. Construction and walking
// ══════════════════════════════════════════════════════════

/// The delta cursor covers exactly the history length.
#[test]
fn test_delta_index_modulus() {
    assert_eq!(DeltaIndex::MODULUS, NUM_DELTAS);
    assert_eq!(DeltaIndex::default().value(), 0);
}

/// A full lap of increments returns to the starting slot.
#[test]
fn test_full_lap_returns_home() {
    let start = DeltaIndex::new(11);
    let mut i = start;
    for _ in 0..NUM_DELTAS {
        i.increment();
    }
    assert_eq!(i, start);
}

/// Walking backwards visits every slot once before reaching the start again.
#[test]
fn test_backward_walk_visits_each_slot() {
    let start = DeltaIndex::new(2);
    let mut seen = Vec::new();
    let mut i = start - 1;
    while i != start {
        seen.push(i.value());
        i.decrement();
    }
    assert_eq!(seen.len(), NUM_DELTAS - 1);
    assert_eq!(seen[..3], [1, 0, 15]);
}

/// Conversion to `usize` yields the reduced value.
#[test]
fn test_into_usize() {
    let i = ModularIndex::<8>::new(13);
    assert_eq!(usize::from(i), 5);
    assert_eq!(i.to_string(), "5 (mod 8)");
}

// ══════════════════════════════════════════════════════════
// 2. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    /// Adding then subtracting the same offset is the identity.
    #[test]
    fn add_sub_roundtrip(start in 0usize..NUM_DELTAS, offset in 0usize..1000) {
        let i = DeltaIndex::new(start);
        prop_assert_eq!((i + offset) - offset, i);
    }

    /// `k` decrements land where subtracting `k` does.
    #[test]
    fn decrement_matches_sub(start in 0usize..NUM_DELTAS, k in 0usize..64) {
        let mut i = DeltaIndex::new(start);
        for _ in 0..k {
            i.decrement();
        }
        prop_assert_eq!(i, DeltaIndex::new(start) - k);
    }

    /// The reduced value is always in range.
    #[test]
    fn value_in_range(raw in any::<usize>()) {
        prop_assert!(DeltaIndex::new(raw).value() < NUM_DELTAS);
    }
}
