//! Entity lifecycle management.
//!
//! The `EntityTable` tracks which identifiers denote live entities. It is a
//! thin layer over one [`IdPool`]: the pool's reserved set is exactly the
//! live-entity set, so identifiers freed by deallocation are recycled
//! smallest-first for later allocations.

use relic_foundation::{Entity, EntityAllocationError};

use crate::id_pool::IdPool;

/// Tracks live entities and allocates their identifiers.
///
/// Entities carry no data; allocation reserves an identifier and
/// deallocation frees it for reuse. Batch operations report one result per
/// element and are not atomic: one element's failure does not block the
/// rest.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    pool: IdPool,
}

impl EntityTable {
    /// Creates a new empty entity table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a single entity.
    ///
    /// # Errors
    ///
    /// Returns [`EntityAllocationError::IdSpaceExhausted`] if the identifier
    /// space is exhausted.
    pub fn allocate(&mut self) -> Result<Entity, EntityAllocationError> {
        self.pool
            .next_available()
            .map(Entity::new)
            .map_err(|_| EntityAllocationError::IdSpaceExhausted)
    }

    /// Allocates `n` entities, one result slot per requested entity.
    ///
    /// Logically `n` independent allocations; a failed element does not
    /// block the others.
    pub fn allocate_batch(&mut self, n: usize) -> Vec<Result<Entity, EntityAllocationError>> {
        (0..n).map(|_| self.allocate()).collect()
    }

    /// Deallocates a single entity, freeing its identifier for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`EntityAllocationError::InvalidEntityDescriptor`] if the
    /// handle is null or does not name a live entity.
    pub fn deallocate(&mut self, entity: Entity) -> Result<(), EntityAllocationError> {
        if !self.contains(entity) {
            return Err(EntityAllocationError::InvalidEntityDescriptor);
        }
        self.pool.free(entity.id);
        Ok(())
    }

    /// Deallocates a batch of entities, one result per element.
    ///
    /// The batch is not atomic: unknown entities report
    /// [`EntityAllocationError::InvalidEntityDescriptor`] in their slot and
    /// the remaining elements are still processed.
    pub fn deallocate_batch(
        &mut self,
        entities: &[Entity],
    ) -> Vec<Result<(), EntityAllocationError>> {
        entities.iter().map(|&e| self.deallocate(e)).collect()
    }

    /// Returns true if the handle names a live entity.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        !entity.is_null() && !self.pool.is_free(entity.id)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Iterates over all live entities in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.pool.iter_reserved().map(Entity::new)
    }

    /// Deallocates every live entity.
    pub fn clear(&mut self) {
        self.pool.clear();
    }
}
