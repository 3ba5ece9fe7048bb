//! Type-erased component storage, one arena per registered component type.
//!
//! An arena owns a contiguous byte buffer carved into fixed-size slots, a
//! slot pool for free-slot tracking, and the entity↔slot mappings. Payloads
//! are opaque byte ranges of the declared size; the caller supplies optional
//! construct/destroy callbacks that operate on the raw slot bytes, so the
//! arena never needs to know the concrete payload type.

// Slot ids double as buffer offsets - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;

use relic_foundation::{
    ComponentAllocationError, ComponentDeallocationError, ComponentGetError, ComponentTypeId,
    Entity, StorageInitError,
};

use crate::id_pool::IdPool;

/// In-place construction callback.
///
/// Receives the freshly allocated (zeroed) slot bytes and the opaque
/// argument blob passed to the construct call.
pub type ConstructFn = fn(dest: &mut [u8], args: &[u8]);

/// In-place destruction callback.
///
/// Receives the slot bytes of the instance being destroyed.
pub type DestroyFn = fn(object: &mut [u8]);

/// Parameters for registering a component storage.
///
/// Omitting both callbacks marks the type trivial: payloads are treated as
/// relocatable raw bytes and no lifecycle hooks are ever invoked.
#[derive(Debug, Clone, Copy)]
pub struct StorageParams {
    component_size: usize,
    construct: Option<ConstructFn>,
    destroy: Option<DestroyFn>,
}

impl StorageParams {
    /// Creates storage parameters for payloads of the given byte size.
    #[must_use]
    pub fn new(component_size: usize) -> Self {
        Self {
            component_size,
            construct: None,
            destroy: None,
        }
    }

    /// Sets the in-place construction callback.
    #[must_use]
    pub fn with_construct(mut self, construct: ConstructFn) -> Self {
        self.construct = Some(construct);
        self
    }

    /// Sets the in-place destruction callback.
    #[must_use]
    pub fn with_destroy(mut self, destroy: DestroyFn) -> Self {
        self.destroy = Some(destroy);
        self
    }

    /// Returns the declared payload byte size.
    #[must_use]
    pub fn component_size(&self) -> usize {
        self.component_size
    }
}

/// Storage arena for one registered component type.
///
/// Slots are recycled smallest-first through an [`IdPool`], so the buffer's
/// high-water footprint tracks the peak number of live instances rather
/// than the total ever allocated. A live slot is never moved: its offset is
/// stable until the instance is deallocated or the arena is released.
#[derive(Debug, Clone)]
pub struct ComponentArena {
    type_id: ComponentTypeId,
    component_size: usize,
    construct: Option<ConstructFn>,
    destroy: Option<DestroyFn>,
    /// Slot payloads, `component_size` bytes per slot.
    buffer: Vec<u8>,
    /// Free-slot tracking; reserved slot ids are exactly the live instances.
    slots: IdPool,
    slot_of: HashMap<Entity, usize>,
    /// Reverse mapping for teardown.
    owner_of: HashMap<usize, Entity>,
}

impl ComponentArena {
    /// Creates an arena for the given descriptor and storage parameters.
    ///
    /// # Errors
    ///
    /// Returns [`StorageInitError::InvalidComponentSize`] if the declared
    /// payload size is zero.
    pub fn new(type_id: ComponentTypeId, params: &StorageParams) -> Result<Self, StorageInitError> {
        if params.component_size == 0 {
            return Err(StorageInitError::InvalidComponentSize);
        }
        Ok(Self {
            type_id,
            component_size: params.component_size,
            construct: params.construct,
            destroy: params.destroy,
            buffer: Vec::new(),
            slots: IdPool::new(),
            slot_of: HashMap::new(),
            owner_of: HashMap::new(),
        })
    }

    /// Returns the descriptor this arena was registered under.
    #[must_use]
    pub fn type_id(&self) -> ComponentTypeId {
        self.type_id
    }

    /// Returns the payload byte size of this component type.
    #[must_use]
    pub fn component_size(&self) -> usize {
        self.component_size
    }

    /// Returns true if a construct callback was registered.
    #[must_use]
    pub fn has_constructor(&self) -> bool {
        self.construct.is_some()
    }

    /// Reserves a slot for the entity without invoking any constructor.
    ///
    /// The returned slot bytes are zeroed. The entity handle is taken at
    /// face value; liveness is the caller's concern (the context validates
    /// it before delegating here).
    ///
    /// # Errors
    ///
    /// - [`ComponentAllocationError::AlreadyExists`] if the entity already
    ///   holds an instance in this arena, leaving the existing slot
    ///   untouched.
    /// - [`ComponentAllocationError::IdSpaceExhausted`] if the slot space is
    ///   exhausted.
    pub fn allocate(&mut self, entity: Entity) -> Result<&mut [u8], ComponentAllocationError> {
        if self.slot_of.contains_key(&entity) {
            return Err(ComponentAllocationError::AlreadyExists);
        }
        let slot = self
            .slots
            .next_available()
            .map_err(|_| ComponentAllocationError::IdSpaceExhausted)? as usize;

        let start = slot * self.component_size;
        let end = start + self.component_size;
        if self.buffer.len() < end {
            self.buffer.resize(end, 0);
        }
        self.buffer[start..end].fill(0);

        self.slot_of.insert(entity, slot);
        self.owner_of.insert(slot, entity);
        Ok(&mut self.buffer[start..end])
    }

    /// Reserves a slot and runs the construct callback on it.
    ///
    /// The callback receives the zeroed slot bytes and the opaque argument
    /// blob. The constructor's presence is checked before any state
    /// changes, so a failure leaves the arena untouched.
    ///
    /// # Errors
    ///
    /// - [`ComponentAllocationError::InvalidConstructor`] if no construct
    ///   callback was registered.
    /// - Any error [`ComponentArena::allocate`] reports.
    pub fn construct(
        &mut self,
        entity: Entity,
        args: &[u8],
    ) -> Result<&mut [u8], ComponentAllocationError> {
        let construct = self
            .construct
            .ok_or(ComponentAllocationError::InvalidConstructor)?;
        let bytes = self.allocate(entity)?;
        construct(bytes, args);
        Ok(bytes)
    }

    /// Returns the live slot bytes for the entity.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentGetError::InvalidComponentId`] if the entity holds
    /// no instance in this arena.
    pub fn get(&self, entity: Entity) -> Result<&[u8], ComponentGetError> {
        let &slot = self
            .slot_of
            .get(&entity)
            .ok_or(ComponentGetError::InvalidComponentId)?;
        let start = slot * self.component_size;
        Ok(&self.buffer[start..start + self.component_size])
    }

    /// Returns the live slot bytes for the entity, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentGetError::InvalidComponentId`] if the entity holds
    /// no instance in this arena.
    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut [u8], ComponentGetError> {
        let &slot = self
            .slot_of
            .get(&entity)
            .ok_or(ComponentGetError::InvalidComponentId)?;
        let start = slot * self.component_size;
        Ok(&mut self.buffer[start..start + self.component_size])
    }

    /// Destroys the entity's instance and recycles its slot.
    ///
    /// Runs the destroy callback (if registered) on the slot bytes, then
    /// returns the slot to the pool and removes the entity↔slot mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentDeallocationError::InvalidEntity`] if the entity
    /// holds no instance in this arena; nothing is mutated in that case.
    pub fn deallocate(&mut self, entity: Entity) -> Result<(), ComponentDeallocationError> {
        let &slot = self
            .slot_of
            .get(&entity)
            .ok_or(ComponentDeallocationError::InvalidEntity)?;

        if let Some(destroy) = self.destroy {
            let start = slot * self.component_size;
            destroy(&mut self.buffer[start..start + self.component_size]);
        }

        self.slot_of.remove(&entity);
        self.owner_of.remove(&slot);
        self.slots.free(slot as u64);
        Ok(())
    }

    /// Destroys every live instance and frees the buffer.
    ///
    /// The destroy callback (if registered) runs exactly once per live slot;
    /// the order across slots is unspecified. The arena holds no instances
    /// afterward and must not be used again.
    pub fn release(&mut self) {
        if let Some(destroy) = self.destroy {
            for &slot in self.owner_of.keys() {
                let start = slot * self.component_size;
                destroy(&mut self.buffer[start..start + self.component_size]);
            }
        }
        self.slot_of.clear();
        self.owner_of.clear();
        self.slots.clear();
        self.buffer = Vec::new();
    }

    /// Returns true if the entity holds an instance in this arena.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.slot_of.contains_key(&entity)
    }

    /// Returns the number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slot_of.len()
    }

    /// Returns true if the arena holds no live instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot_of.is_empty()
    }

    /// Iterates over all entities holding an instance in this arena.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slot_of.keys().copied()
    }
}
