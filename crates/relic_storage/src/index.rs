//! Bidirectional entity↔component index with cached selections.
//!
//! Two side mappings are kept in lockstep: entity → set of component
//! descriptors, and descriptor → set of entities. Set-intersection queries
//! answer "which entities hold every descriptor in this set", and their
//! results may be cached per descriptor set. The cache is a derived
//! projection, never the source of truth: any mutation touching a
//! descriptor drops every cached selection mentioning it.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use relic_foundation::{
    ComponentTypeId, Entity, IdExhausted, RegisterError, SelectionId, UnregisterError,
};

use crate::id_pool::IdPool;

/// An immutable query result.
///
/// Selections are values produced at a point in time: later mutation of the
/// index does not change an issued selection, only whether its cached
/// backing may be reused. The core owns the backing array; the caller owns
/// the handle and must release it with
/// [`RelationalIndex::free_selection`] when done.
#[derive(Debug, Clone)]
pub struct Selection {
    handle: SelectionId,
    entities: Arc<[Entity]>,
}

impl Selection {
    /// Returns the handle to pass to the release call.
    #[must_use]
    pub fn handle(&self) -> SelectionId {
        self.handle
    }

    /// Returns the selected entities, ascending by identifier.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns the number of selected entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no entities were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns true if the selection contains the entity.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.binary_search(&entity).is_ok()
    }
}

/// Bidirectional entity↔component relational index.
///
/// Records which component types each entity currently holds and answers
/// set-intersection queries over that relation. Batch mutations report one
/// result per element and are not atomic.
#[derive(Debug, Clone, Default)]
pub struct RelationalIndex {
    /// Entity → descriptors it holds.
    forward: HashMap<Entity, BTreeSet<ComponentTypeId>>,
    /// Descriptor → entities holding it. Keys exist only while at least one
    /// entity holds the descriptor.
    reverse: HashMap<ComponentTypeId, BTreeSet<Entity>>,
    /// Cached query results, keyed by the sorted, deduplicated descriptor set.
    cache: HashMap<Vec<ComponentTypeId>, Arc<[Entity]>>,
    /// Live selections by handle.
    selections: HashMap<SelectionId, Arc<[Entity]>>,
    selection_ids: IdPool,
}

impl RelationalIndex {
    /// Creates a new empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the entity holds the component type.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::AlreadyRegistered`] if the association
    /// already exists; nothing changes in that case.
    pub fn register(
        &mut self,
        entity: Entity,
        component: ComponentTypeId,
    ) -> Result<(), RegisterError> {
        let held = self.forward.entry(entity).or_default();
        if !held.insert(component) {
            return Err(RegisterError::AlreadyRegistered);
        }
        self.reverse.entry(component).or_default().insert(entity);
        self.invalidate(component);
        Ok(())
    }

    /// Records several associations for one entity, one result per element.
    ///
    /// The batch is not atomic: each element succeeds or fails on its own.
    pub fn register_batch(
        &mut self,
        entity: Entity,
        components: &[ComponentTypeId],
    ) -> Vec<Result<(), RegisterError>> {
        components
            .iter()
            .map(|&c| self.register(entity, c))
            .collect()
    }

    /// Removes the association between the entity and the component type.
    ///
    /// # Errors
    ///
    /// - [`UnregisterError::ComponentNotFound`] if no entity at all holds
    ///   the descriptor.
    /// - [`UnregisterError::NotRegistered`] if the descriptor is held, but
    ///   not by this entity.
    pub fn unregister(
        &mut self,
        entity: Entity,
        component: ComponentTypeId,
    ) -> Result<(), UnregisterError> {
        let holders = self
            .reverse
            .get_mut(&component)
            .ok_or(UnregisterError::ComponentNotFound)?;
        if !holders.remove(&entity) {
            return Err(UnregisterError::NotRegistered);
        }
        if holders.is_empty() {
            self.reverse.remove(&component);
        }

        if let Some(held) = self.forward.get_mut(&entity) {
            held.remove(&component);
            if held.is_empty() {
                self.forward.remove(&entity);
            }
        }
        self.invalidate(component);
        Ok(())
    }

    /// Removes several associations for one entity, one result per element.
    ///
    /// The batch is not atomic: each element succeeds or fails on its own.
    pub fn unregister_batch(
        &mut self,
        entity: Entity,
        components: &[ComponentTypeId],
    ) -> Vec<Result<(), UnregisterError>> {
        components
            .iter()
            .map(|&c| self.unregister(entity, c))
            .collect()
    }

    /// Removes every association of the entity.
    ///
    /// Intended for entity teardown; unknown entities are a no-op.
    pub fn on_entity_removed(&mut self, entity: Entity) {
        let Some(held) = self.forward.remove(&entity) else {
            return;
        };
        for component in held {
            if let Some(holders) = self.reverse.get_mut(&component) {
                holders.remove(&entity);
                if holders.is_empty() {
                    self.reverse.remove(&component);
                }
            }
            self.invalidate(component);
        }
    }

    /// Removes every association involving the component type.
    ///
    /// Intended for storage teardown; descriptors unknown to the index are
    /// a no-op.
    pub fn on_storage_released(&mut self, component: ComponentTypeId) {
        let Some(holders) = self.reverse.remove(&component) else {
            return;
        };
        for entity in holders {
            if let Some(held) = self.forward.get_mut(&entity) {
                held.remove(&component);
                if held.is_empty() {
                    self.forward.remove(&entity);
                }
            }
        }
        self.invalidate(component);
    }

    /// Returns true if the entity holds the component type.
    #[must_use]
    pub fn holds(&self, entity: Entity, component: ComponentTypeId) -> bool {
        self.forward
            .get(&entity)
            .is_some_and(|held| held.contains(&component))
    }

    /// Enumerates the component types the entity holds, ascending.
    pub fn components_of(&self, entity: Entity) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.forward
            .get(&entity)
            .into_iter()
            .flat_map(|held| held.iter().copied())
    }

    /// Enumerates the entities holding the component type, ascending.
    pub fn entities_with(&self, component: ComponentTypeId) -> impl Iterator<Item = Entity> + '_ {
        self.reverse
            .get(&component)
            .into_iter()
            .flat_map(|holders| holders.iter().copied())
    }

    /// Selects the entities holding every component type in the set.
    ///
    /// The result is ordered ascending by entity identifier. An empty
    /// requested set selects no entities: the query asks for entities
    /// constrained by the listed descriptors, and listing none expresses no
    /// constraint to satisfy. Descriptors unknown to the index intersect as
    /// empty sets.
    ///
    /// Identical descriptor sets may be answered from a cache; cached or
    /// not, the result is the same. The returned selection stays valid
    /// until passed to [`RelationalIndex::free_selection`].
    ///
    /// # Errors
    ///
    /// Returns [`IdExhausted`] if the selection-handle space is exhausted.
    pub fn select(&mut self, components: &[ComponentTypeId]) -> Result<Selection, IdExhausted> {
        let mut key: Vec<ComponentTypeId> = components.to_vec();
        key.sort_unstable();
        key.dedup();

        let entities: Arc<[Entity]> = if key.is_empty() {
            Arc::from(Vec::new())
        } else if let Some(cached) = self.cache.get(&key) {
            Arc::clone(cached)
        } else {
            let computed: Arc<[Entity]> = self.intersect(&key).into();
            self.cache.insert(key, Arc::clone(&computed));
            computed
        };

        let handle = SelectionId::new(self.selection_ids.next_available()?);
        self.selections.insert(handle, Arc::clone(&entities));
        Ok(Selection { handle, entities })
    }

    /// Releases the backing array of a previously returned selection.
    ///
    /// Returns false if the handle does not name a live selection. The
    /// handle must not be used again after release.
    pub fn free_selection(&mut self, handle: SelectionId) -> bool {
        if self.selections.remove(&handle).is_some() {
            self.selection_ids.free(handle.id);
            true
        } else {
            false
        }
    }

    /// Returns the number of selections issued and not yet freed.
    #[must_use]
    pub fn live_selections(&self) -> usize {
        self.selections.len()
    }

    /// Returns the number of query results currently cached.
    #[must_use]
    pub fn cached_selections(&self) -> usize {
        self.cache.len()
    }

    /// Drops all associations, cached results, and live selections.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
        self.cache.clear();
        self.selections.clear();
        self.selection_ids.clear();
    }

    /// Intersects the per-descriptor entity sets for a sorted, deduplicated,
    /// non-empty key.
    fn intersect(&self, key: &[ComponentTypeId]) -> Vec<Entity> {
        let mut sets = Vec::with_capacity(key.len());
        for component in key {
            match self.reverse.get(component) {
                Some(holders) => sets.push(holders),
                None => return Vec::new(),
            }
        }
        // Walk the smallest set in ascending order and probe the rest, so
        // the result comes out sorted by entity id.
        let (smallest, rest): (_, Vec<&BTreeSet<Entity>>) = {
            let idx = sets
                .iter()
                .enumerate()
                .min_by_key(|(_, s)| s.len())
                .map_or(0, |(i, _)| i);
            let smallest = sets[idx];
            let rest = sets
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != idx)
                .map(|(_, &s)| s)
                .collect();
            (smallest, rest)
        };
        smallest
            .iter()
            .copied()
            .filter(|e| rest.iter().all(|s| s.contains(e)))
            .collect()
    }

    /// Drops every cached selection whose descriptor set mentions the
    /// component type.
    fn invalidate(&mut self, component: ComponentTypeId) {
        self.cache.retain(|key, _| !key.contains(&component));
    }
}
