//! Composition root tying the store together.
//!
//! The `Context` owns the entity table, the registry of component arenas,
//! and the relational index. Every cross-structure operation goes through
//! it, which is what keeps the core invariant observable at all times: an
//! entity↔component association exists in the index if and only if the
//! component's arena holds a live slot for that entity.

use std::collections::HashMap;

use relic_foundation::{
    ComponentAllocationError, ComponentDeallocationError, ComponentGetError, ComponentTypeId,
    Entity, EntityAllocationError, IdExhausted, SelectionId, StorageInitError,
    StorageReleaseError,
};

use crate::arena::{ComponentArena, StorageParams};
use crate::entity::EntityTable;
use crate::id_pool::IdPool;
use crate::index::{RelationalIndex, Selection};

/// Composition root: entity table, arena registry, relational index.
///
/// An explicit, caller-constructed value with an explicit lifecycle; there
/// is no implicit singleton. The context exclusively owns all component
/// memory and identifier state. Callers receive handles and borrows, never
/// ownership, and no handle survives [`Context::release`].
///
/// Access is single-threaded or externally synchronized; the `&mut self`
/// receivers encode that requirement in the API.
#[derive(Debug, Default)]
pub struct Context {
    entities: EntityTable,
    arenas: HashMap<ComponentTypeId, ComponentArena>,
    index: RelationalIndex,
    type_ids: IdPool,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Storage registry ---

    /// Registers a component storage, assigning it a fresh descriptor.
    ///
    /// # Errors
    ///
    /// - [`StorageInitError::InvalidComponentSize`] if the declared payload
    ///   size is zero.
    /// - [`StorageInitError::IdSpaceExhausted`] if the descriptor space is
    ///   exhausted.
    pub fn register_storage(
        &mut self,
        params: &StorageParams,
    ) -> Result<ComponentTypeId, StorageInitError> {
        if params.component_size() == 0 {
            return Err(StorageInitError::InvalidComponentSize);
        }
        let type_id = ComponentTypeId::new(
            self.type_ids
                .next_available()
                .map_err(|_| StorageInitError::IdSpaceExhausted)?,
        );
        let arena = ComponentArena::new(type_id, params)?;
        self.arenas.insert(type_id, arena);
        Ok(type_id)
    }

    /// Releases a component storage.
    ///
    /// Destroys every live payload of that type, removes all of its
    /// associations from the index, and frees the descriptor for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`StorageReleaseError::InvalidComponentDescriptor`] if the
    /// descriptor does not name a registered storage.
    pub fn release_storage(&mut self, component: ComponentTypeId) -> Result<(), StorageReleaseError> {
        let mut arena = self
            .arenas
            .remove(&component)
            .ok_or(StorageReleaseError::InvalidComponentDescriptor)?;
        arena.release();
        self.index.on_storage_released(component);
        self.type_ids.free(component.id);
        Ok(())
    }

    /// Returns the number of registered storages.
    #[must_use]
    pub fn storage_count(&self) -> usize {
        self.arenas.len()
    }

    /// Returns the payload byte size of a registered storage, if any.
    #[must_use]
    pub fn component_size(&self, component: ComponentTypeId) -> Option<usize> {
        self.arenas.get(&component).map(ComponentArena::component_size)
    }

    // --- Entities ---

    /// Allocates a single entity.
    ///
    /// # Errors
    ///
    /// Returns [`EntityAllocationError::IdSpaceExhausted`] if the entity
    /// identifier space is exhausted.
    pub fn create_entity(&mut self) -> Result<Entity, EntityAllocationError> {
        self.entities.allocate()
    }

    /// Allocates `n` entities, one result slot per requested entity.
    pub fn allocate_entities(&mut self, n: usize) -> Vec<Result<Entity, EntityAllocationError>> {
        self.entities.allocate_batch(n)
    }

    /// Destroys a single entity.
    ///
    /// Every component the entity holds is detached first: destroy
    /// callbacks run, slots are recycled, and the index associations are
    /// removed. Only then is the identifier freed for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`EntityAllocationError::InvalidEntityDescriptor`] if the
    /// handle does not name a live entity; nothing is mutated in that case.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EntityAllocationError> {
        if !self.entities.contains(entity) {
            return Err(EntityAllocationError::InvalidEntityDescriptor);
        }
        let held: Vec<ComponentTypeId> = self.index.components_of(entity).collect();
        for component in held {
            if let Some(arena) = self.arenas.get_mut(&component) {
                let deallocated = arena.deallocate(entity);
                debug_assert!(deallocated.is_ok());
            }
        }
        self.index.on_entity_removed(entity);
        self.entities.deallocate(entity)
    }

    /// Destroys a batch of entities, one result per element.
    ///
    /// The batch is not atomic: unknown entities report
    /// [`EntityAllocationError::InvalidEntityDescriptor`] in their slot and
    /// the remaining elements are still processed.
    pub fn deallocate_entities(
        &mut self,
        entities: &[Entity],
    ) -> Vec<Result<(), EntityAllocationError>> {
        entities.iter().map(|&e| self.destroy_entity(e)).collect()
    }

    /// Returns true if the handle names a live entity.
    #[must_use]
    pub fn contains_entity(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // --- Components ---

    /// Attaches a component to an entity without invoking any constructor.
    ///
    /// Returns the zeroed slot bytes. The arena slot and the index
    /// association are created together; on any failure neither exists.
    ///
    /// # Errors
    ///
    /// In precedence order: [`ComponentAllocationError::InvalidEntity`],
    /// [`ComponentAllocationError::InvalidComponentDescriptor`],
    /// [`ComponentAllocationError::AlreadyExists`],
    /// [`ComponentAllocationError::IdSpaceExhausted`].
    pub fn allocate_component(
        &mut self,
        entity: Entity,
        component: ComponentTypeId,
    ) -> Result<&mut [u8], ComponentAllocationError> {
        if !self.entities.contains(entity) {
            return Err(ComponentAllocationError::InvalidEntity);
        }
        let arena = self
            .arenas
            .get_mut(&component)
            .ok_or(ComponentAllocationError::InvalidComponentDescriptor)?;
        arena.allocate(entity).map(|_| ())?;

        let registered = self.index.register(entity, component);
        debug_assert!(registered.is_ok());

        self.slot_bytes_mut(entity, component)
    }

    /// Attaches a component to an entity and runs its construct callback.
    ///
    /// The callback receives the zeroed slot bytes and the opaque argument
    /// blob; the constructor's presence is checked before any state change.
    ///
    /// # Errors
    ///
    /// As [`Context::allocate_component`], plus
    /// [`ComponentAllocationError::InvalidConstructor`] if the storage was
    /// registered without a construct callback.
    pub fn construct_component(
        &mut self,
        entity: Entity,
        component: ComponentTypeId,
        args: &[u8],
    ) -> Result<&mut [u8], ComponentAllocationError> {
        if !self.entities.contains(entity) {
            return Err(ComponentAllocationError::InvalidEntity);
        }
        let arena = self
            .arenas
            .get_mut(&component)
            .ok_or(ComponentAllocationError::InvalidComponentDescriptor)?;
        arena.construct(entity, args).map(|_| ())?;

        let registered = self.index.register(entity, component);
        debug_assert!(registered.is_ok());

        self.slot_bytes_mut(entity, component)
    }

    /// Returns the component payload bytes for an entity.
    ///
    /// The borrow is valid until the next mutation of the context; the
    /// underlying slot itself stays put until the component is deallocated
    /// or its storage is released.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentGetError::InvalidEntity`] for a dead entity and
    /// [`ComponentGetError::InvalidComponentId`] if no association exists.
    pub fn get_component(
        &self,
        entity: Entity,
        component: ComponentTypeId,
    ) -> Result<&[u8], ComponentGetError> {
        if !self.entities.contains(entity) {
            return Err(ComponentGetError::InvalidEntity);
        }
        self.arenas
            .get(&component)
            .ok_or(ComponentGetError::InvalidComponentId)?
            .get(entity)
    }

    /// Returns the component payload bytes for an entity, mutably.
    ///
    /// # Errors
    ///
    /// As [`Context::get_component`].
    pub fn get_component_mut(
        &mut self,
        entity: Entity,
        component: ComponentTypeId,
    ) -> Result<&mut [u8], ComponentGetError> {
        if !self.entities.contains(entity) {
            return Err(ComponentGetError::InvalidEntity);
        }
        self.arenas
            .get_mut(&component)
            .ok_or(ComponentGetError::InvalidComponentId)?
            .get_mut(entity)
    }

    /// Detaches a component from an entity.
    ///
    /// Runs the destroy callback (if registered), recycles the slot, and
    /// removes the index association together.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentDeallocationError::InvalidEntity`] for a dead
    /// entity or a missing association, and
    /// [`ComponentDeallocationError::InvalidComponentDescriptor`] for an
    /// unregistered storage.
    pub fn deallocate_component(
        &mut self,
        entity: Entity,
        component: ComponentTypeId,
    ) -> Result<(), ComponentDeallocationError> {
        if !self.entities.contains(entity) {
            return Err(ComponentDeallocationError::InvalidEntity);
        }
        let arena = self
            .arenas
            .get_mut(&component)
            .ok_or(ComponentDeallocationError::InvalidComponentDescriptor)?;
        arena.deallocate(entity)?;

        let unregistered = self.index.unregister(entity, component);
        debug_assert!(unregistered.is_ok());
        Ok(())
    }

    /// Attaches several components to one entity, one result per element.
    ///
    /// The batch is not atomic: each element succeeds or fails on its own.
    pub fn allocate_components(
        &mut self,
        entity: Entity,
        components: &[ComponentTypeId],
    ) -> Vec<Result<(), ComponentAllocationError>> {
        let mut results = Vec::with_capacity(components.len());
        for &component in components {
            results.push(self.allocate_component(entity, component).map(|_| ()));
        }
        results
    }

    /// Detaches several components from one entity, one result per element.
    ///
    /// The batch is not atomic: each element succeeds or fails on its own.
    pub fn deallocate_components(
        &mut self,
        entity: Entity,
        components: &[ComponentTypeId],
    ) -> Vec<Result<(), ComponentDeallocationError>> {
        let mut results = Vec::with_capacity(components.len());
        for &component in components {
            results.push(self.deallocate_component(entity, component));
        }
        results
    }

    /// Returns true if the entity currently holds the component type.
    #[must_use]
    pub fn holds(&self, entity: Entity, component: ComponentTypeId) -> bool {
        self.index.holds(entity, component)
    }

    /// Enumerates the component types the entity holds, ascending.
    pub fn components_of(&self, entity: Entity) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.index.components_of(entity)
    }

    // --- Queries ---

    /// Selects the entities holding every component type in the set.
    ///
    /// See [`RelationalIndex::select`] for ordering, caching, and the
    /// empty-set convention.
    ///
    /// # Errors
    ///
    /// Returns [`IdExhausted`] if the selection-handle space is exhausted.
    pub fn select_entities_by_components(
        &mut self,
        components: &[ComponentTypeId],
    ) -> Result<Selection, IdExhausted> {
        self.index.select(components)
    }

    /// Releases a previously returned selection.
    ///
    /// Returns false if the handle does not name a live selection.
    pub fn free_entity_selection(&mut self, handle: SelectionId) -> bool {
        self.index.free_selection(handle)
    }

    // --- Lifecycle ---

    /// Tears the whole context down.
    ///
    /// Every registered arena is released first (running destroy callbacks
    /// on all live payloads), then the relational index is cleared, then
    /// the entity table. All previously issued handles are invalid
    /// afterward; the context itself is reusable as empty.
    pub fn release(&mut self) {
        for arena in self.arenas.values_mut() {
            arena.release();
        }
        self.arenas.clear();
        self.index.clear();
        self.entities.clear();
        self.type_ids.clear();
    }

    /// Looks the slot bytes back up after arena and index agree.
    fn slot_bytes_mut(
        &mut self,
        entity: Entity,
        component: ComponentTypeId,
    ) -> Result<&mut [u8], ComponentAllocationError> {
        self.arenas
            .get_mut(&component)
            .ok_or(ComponentAllocationError::InvalidComponentDescriptor)?
            .get_mut(entity)
            .map_err(|_| ComponentAllocationError::InvalidEntity)
    }
}
