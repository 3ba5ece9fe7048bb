//! Integration tests for the identifier pool
//!
//! Tests smallest-available recycling, caller-chosen reservation, and the
//! ordering contract under interleaved reserve/free.

use proptest::prelude::*;
use relic_storage::IdPool;

// =============================================================================
// Smallest-Available Ordering
// =============================================================================

#[test]
fn allocation_counts_up_on_a_fresh_pool() {
    let mut pool = IdPool::new();
    for expected in 0..100 {
        assert_eq!(pool.next_available(), Ok(expected));
    }
}

#[test]
fn scattered_reservations_do_not_skew_allocation_order() {
    let mut pool = IdPool::new();
    assert!(pool.reserve(3));
    assert!(pool.reserve(5));
    assert!(pool.reserve(8));

    pool.free(3);
    pool.free(5);
    pool.free(8);

    // Everything below 10 is free again, so allocation walks 0..10 in order.
    for expected in 0..10 {
        assert_eq!(pool.next_available(), Ok(expected));
    }
}

#[test]
fn freed_id_waits_behind_smaller_free_ids() {
    let mut pool = IdPool::new();
    for _ in 0..5 {
        pool.next_available().unwrap();
    }

    pool.free(4);
    pool.free(1);

    assert_eq!(pool.next_available(), Ok(1));
    assert_eq!(pool.next_available(), Ok(4));
    assert_eq!(pool.next_available(), Ok(5));
}

// =============================================================================
// Reservation
// =============================================================================

#[test]
fn reserve_claims_exactly_the_requested_id() {
    let mut pool = IdPool::new();

    assert!(pool.reserve(100));
    assert!(!pool.is_free(100));
    for id in 0..100 {
        assert!(pool.is_free(id));
    }
}

#[test]
fn reserve_fails_on_a_reserved_id_without_side_effects() {
    let mut pool = IdPool::new();

    assert!(pool.reserve(7));
    assert!(!pool.reserve(7));
    assert_eq!(pool.len(), 1);

    pool.free(7);
    assert!(pool.reserve(7));
}

// =============================================================================
// Free
// =============================================================================

#[test]
fn double_free_is_harmless() {
    let mut pool = IdPool::new();
    let id = pool.next_available().unwrap();

    pool.free(id);
    pool.free(id);

    assert_eq!(pool.next_available(), Ok(id));
    assert_eq!(pool.len(), 1);
}

// =============================================================================
// Ordering Invariant
// =============================================================================

proptest! {
    /// Whatever sequence of reservations and frees ran before, the next
    /// allocation returns the smallest identifier that was free just before
    /// the call.
    #[test]
    fn next_available_is_always_the_smallest_free_id(
        reserved in prop::collection::btree_set(0..128u64, 0..32),
        freed in prop::collection::vec(0..128u64, 0..32),
    ) {
        let mut pool = IdPool::new();
        for &id in &reserved {
            prop_assert!(pool.reserve(id));
        }
        for &id in &freed {
            pool.free(id);
        }

        let smallest_free = (0u64..).find(|&id| pool.is_free(id)).unwrap();
        prop_assert_eq!(pool.next_available(), Ok(smallest_free));
        prop_assert!(!pool.is_free(smallest_free));
    }
}
