//! Opaque handle types for entities, component storages, and selections.
//!
//! All handles are dense non-negative integers drawn from recycling pools.
//! The all-bits-set value is reserved as the null sentinel and is never a
//! valid handle.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An entity handle: an opaque relational key with no intrinsic payload.
///
/// Entities carry no data themselves. They exist to be associated with
/// component instances, and their identifiers double as dense array indices
/// inside the storage layer. An identifier is unique among currently live
/// entities of one context and may be reused after deallocation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    /// Dense identifier assigned by the entity table.
    pub id: u64,
}

impl Entity {
    /// Creates an entity handle with the given identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    /// Returns the null sentinel (`u64::MAX`, all bits set).
    ///
    /// The storage layer never allocates this identifier.
    #[must_use]
    pub const fn null() -> Self {
        Self { id: u64::MAX }
    }

    /// Returns true if this is the null sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.id == u64::MAX
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({})", self.id)
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A component type descriptor: names one registered storage arena.
///
/// Assigned when a storage is registered with the context. Exactly one arena
/// exists per descriptor; using an unregistered descriptor in any operation
/// is an error reported by that operation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentTypeId {
    /// Dense identifier assigned by the storage registry.
    pub id: u64,
}

impl ComponentTypeId {
    /// Creates a descriptor with the given identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    /// Returns the null sentinel (`u64::MAX`, all bits set).
    #[must_use]
    pub const fn null() -> Self {
        Self { id: u64::MAX }
    }

    /// Returns true if this is the null sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.id == u64::MAX
    }
}

impl fmt::Debug for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "ComponentTypeId(null)")
        } else {
            write!(f, "ComponentTypeId({})", self.id)
        }
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A selection handle: names a query result owned by the core.
///
/// Returned by set-intersection queries. The caller must pass the handle
/// back to the release call when done with the result; the handle must not
/// be used afterward.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionId {
    /// Dense identifier assigned by the selection table.
    pub id: u64,
}

impl SelectionId {
    /// Creates a selection handle with the given identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    /// Returns the null sentinel (`u64::MAX`, all bits set).
    #[must_use]
    pub const fn null() -> Self {
        Self { id: u64::MAX }
    }

    /// Returns true if this is the null sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.id == u64::MAX
    }
}

impl fmt::Debug for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "SelectionId(null)")
        } else {
            write!(f, "SelectionId({})", self.id)
        }
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
