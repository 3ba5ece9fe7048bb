//! Error taxonomy, one enum per operation family.
//!
//! Uses `thiserror` for ergonomic error definition. Every failure is
//! returned as a value to the immediate caller; nothing in the store raises
//! through non-local control transfer. Batch operations report one result
//! per input element, so all error types are `Copy + Eq` and cheap to
//! collect and compare.

use thiserror::Error;

/// The identifier space of a pool is exhausted.
///
/// The all-bits-set value is reserved as the null sentinel, so a pool can
/// hand out at most `u64::MAX` identifiers. Callers should treat this as
/// fatal; it is reported distinctly rather than wrapped into a catch-all.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("identifier space exhausted")]
pub struct IdExhausted;

/// Failures when recording an entity↔component association.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// The entity already holds this component type.
    #[error("component already registered for entity")]
    AlreadyRegistered,
}

/// Failures when removing an entity↔component association.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UnregisterError {
    /// The component type is unknown to the index; no entity holds it.
    #[error("component not found")]
    ComponentNotFound,
    /// The component type is known, but this entity does not hold it.
    #[error("component not registered for entity")]
    NotRegistered,
}

/// Failures when allocating or deallocating entities.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EntityAllocationError {
    /// The handle does not name a live entity.
    #[error("invalid entity descriptor")]
    InvalidEntityDescriptor,
    /// The entity identifier space is exhausted.
    #[error("entity identifier space exhausted")]
    IdSpaceExhausted,
}

/// Failures when initializing a component storage.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StorageInitError {
    /// The declared component payload size is zero.
    #[error("invalid component size")]
    InvalidComponentSize,
    /// The descriptor identifier space is exhausted.
    #[error("component descriptor space exhausted")]
    IdSpaceExhausted,
}

/// Failures when releasing a component storage.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StorageReleaseError {
    /// The descriptor does not name a registered storage.
    #[error("invalid component descriptor")]
    InvalidComponentDescriptor,
}

/// Failures when allocating or constructing a component instance.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ComponentAllocationError {
    /// The entity already holds an instance of this component type.
    #[error("component already exists for entity")]
    AlreadyExists,
    /// No construct callback was registered for this component type.
    #[error("invalid constructor")]
    InvalidConstructor,
    /// The descriptor does not name a registered storage.
    #[error("invalid component descriptor")]
    InvalidComponentDescriptor,
    /// The handle does not name a live entity.
    #[error("invalid entity")]
    InvalidEntity,
    /// The arena's slot identifier space is exhausted.
    #[error("slot identifier space exhausted")]
    IdSpaceExhausted,
}

/// Failures when deallocating a component instance.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ComponentDeallocationError {
    /// The descriptor does not name a registered storage.
    #[error("invalid component descriptor")]
    InvalidComponentDescriptor,
    /// The entity is not live, or holds no instance of this component type.
    #[error("invalid entity")]
    InvalidEntity,
}

/// Failures when looking up a component instance.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ComponentGetError {
    /// The handle does not name a live entity.
    #[error("invalid entity")]
    InvalidEntity,
    /// The entity holds no instance of this component type, or the
    /// descriptor does not name a registered storage.
    #[error("invalid component id")]
    InvalidComponentId,
}
