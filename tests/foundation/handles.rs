//! Integration tests for handle types
//!
//! Tests the null sentinel convention and handle identity semantics.

use relic_foundation::{ComponentTypeId, Entity, SelectionId};

// =============================================================================
// Null Sentinel
// =============================================================================

#[test]
fn null_is_all_bits_set() {
    assert_eq!(Entity::null().id, u64::MAX);
    assert_eq!(ComponentTypeId::null().id, u64::MAX);
    assert_eq!(SelectionId::null().id, u64::MAX);
}

#[test]
fn null_is_never_a_valid_handle() {
    assert!(Entity::null().is_null());
    assert!(!Entity::new(0).is_null());
    assert!(!Entity::new(u64::MAX - 1).is_null());
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn handles_compare_by_identifier() {
    assert_eq!(Entity::new(3), Entity::new(3));
    assert_ne!(Entity::new(3), Entity::new(4));
}

#[test]
fn handles_order_by_identifier() {
    let mut entities = vec![Entity::new(5), Entity::new(1), Entity::new(3)];
    entities.sort();
    assert_eq!(
        entities,
        vec![Entity::new(1), Entity::new(3), Entity::new(5)]
    );
}

#[test]
fn handle_types_are_distinct() {
    // Same raw id, different meaning; the types keep them apart at compile
    // time, and their debug forms keep them apart in test output.
    assert_eq!(format!("{:?}", Entity::new(2)), "Entity(2)");
    assert_eq!(format!("{:?}", ComponentTypeId::new(2)), "ComponentTypeId(2)");
    assert_eq!(format!("{:?}", SelectionId::new(2)), "SelectionId(2)");
}
