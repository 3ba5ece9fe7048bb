//! Integration tests for the error taxonomy
//!
//! Each operation family carries its own enumerated failure reasons; all of
//! them are plain values that display a human-readable reason.

use relic_foundation::{
    ComponentAllocationError, ComponentDeallocationError, ComponentGetError,
    EntityAllocationError, IdExhausted, RegisterError, StorageInitError, StorageReleaseError,
    UnregisterError,
};

// =============================================================================
// Display
// =============================================================================

#[test]
fn every_family_displays_a_reason() {
    let messages = [
        format!("{}", RegisterError::AlreadyRegistered),
        format!("{}", UnregisterError::ComponentNotFound),
        format!("{}", UnregisterError::NotRegistered),
        format!("{}", EntityAllocationError::InvalidEntityDescriptor),
        format!("{}", StorageInitError::InvalidComponentSize),
        format!("{}", StorageReleaseError::InvalidComponentDescriptor),
        format!("{}", ComponentAllocationError::InvalidConstructor),
        format!("{}", ComponentDeallocationError::InvalidComponentDescriptor),
        format!("{}", ComponentGetError::InvalidComponentId),
        format!("{IdExhausted}"),
    ];

    for message in &messages {
        assert!(!message.is_empty());
    }
}

// =============================================================================
// Value Semantics
// =============================================================================

#[test]
fn errors_are_plain_comparable_values() {
    let a = ComponentAllocationError::AlreadyExists;
    let b = a; // Copy
    assert_eq!(a, b);
    assert_ne!(a, ComponentAllocationError::InvalidEntity);
}

#[test]
fn exhaustion_is_its_own_error() {
    // Identifier exhaustion is reported distinctly, never folded into a
    // catch-all variant.
    assert_eq!(
        EntityAllocationError::IdSpaceExhausted,
        EntityAllocationError::IdSpaceExhausted
    );
    assert_ne!(
        EntityAllocationError::IdSpaceExhausted,
        EntityAllocationError::InvalidEntityDescriptor
    );
}

#[test]
fn errors_implement_std_error() {
    fn assert_error<E: std::error::Error>(_: E) {}

    assert_error(RegisterError::AlreadyRegistered);
    assert_error(ComponentGetError::InvalidEntity);
    assert_error(IdExhausted);
}
