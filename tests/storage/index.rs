//! Integration tests for relational queries
//!
//! Tests set-intersection selections, result ordering, caching behavior,
//! and selection handle lifecycle through the context.

use relic_foundation::Entity;
use relic_storage::{Context, StorageParams};

// =============================================================================
// Set-Intersection Queries
// =============================================================================

#[test]
fn intersection_returns_only_entities_holding_every_descriptor() {
    let mut ctx = Context::new();
    let a = ctx.register_storage(&StorageParams::new(4)).unwrap();
    let b = ctx.register_storage(&StorageParams::new(4)).unwrap();

    let e1 = ctx.create_entity().unwrap();
    let e2 = ctx.create_entity().unwrap();
    ctx.allocate_component(e1, a).unwrap();
    ctx.allocate_component(e2, a).unwrap();
    ctx.allocate_component(e2, b).unwrap();

    let both = ctx.select_entities_by_components(&[a, b]).unwrap();
    assert_eq!(both.entities(), &[e2]);

    let only_a = ctx.select_entities_by_components(&[a]).unwrap();
    assert_eq!(only_a.entities(), &[e1, e2]);
}

#[test]
fn selections_are_ordered_ascending_by_entity_id() {
    let mut ctx = Context::new();
    let c = ctx.register_storage(&StorageParams::new(4)).unwrap();

    let entities: Vec<Entity> = ctx
        .allocate_entities(6)
        .into_iter()
        .map(Result::unwrap)
        .collect();
    // Attach in a scrambled order.
    for &e in &[entities[4], entities[0], entities[5], entities[2]] {
        ctx.allocate_component(e, c).unwrap();
    }

    let selection = ctx.select_entities_by_components(&[c]).unwrap();
    assert_eq!(
        selection.entities(),
        &[entities[0], entities[2], entities[4], entities[5]]
    );
}

#[test]
fn empty_descriptor_set_selects_no_entities() {
    let mut ctx = Context::new();
    let c = ctx.register_storage(&StorageParams::new(4)).unwrap();
    let e = ctx.create_entity().unwrap();
    ctx.allocate_component(e, c).unwrap();

    let selection = ctx.select_entities_by_components(&[]).unwrap();
    assert!(selection.is_empty());
}

// =============================================================================
// Cache Soundness
// =============================================================================

#[test]
fn repeated_queries_agree_with_the_first() {
    let mut ctx = Context::new();
    let c = ctx.register_storage(&StorageParams::new(4)).unwrap();
    let e = ctx.create_entity().unwrap();
    ctx.allocate_component(e, c).unwrap();

    let cold = ctx.select_entities_by_components(&[c]).unwrap();
    let warm = ctx.select_entities_by_components(&[c]).unwrap();
    assert_eq!(cold.entities(), warm.entities());
}

#[test]
fn queries_after_mutation_reflect_the_mutation() {
    let mut ctx = Context::new();
    let c = ctx.register_storage(&StorageParams::new(4)).unwrap();
    let e1 = ctx.create_entity().unwrap();
    ctx.allocate_component(e1, c).unwrap();

    // Prime the cache.
    let before = ctx.select_entities_by_components(&[c]).unwrap();
    assert_eq!(before.entities(), &[e1]);

    let e2 = ctx.create_entity().unwrap();
    ctx.allocate_component(e2, c).unwrap();

    let after = ctx.select_entities_by_components(&[c]).unwrap();
    assert_eq!(after.entities(), &[e1, e2]);

    ctx.deallocate_component(e1, c).unwrap();
    let final_state = ctx.select_entities_by_components(&[c]).unwrap();
    assert_eq!(final_state.entities(), &[e2]);
}

#[test]
fn issued_selections_stay_stable_across_mutation() {
    let mut ctx = Context::new();
    let c = ctx.register_storage(&StorageParams::new(4)).unwrap();
    let e1 = ctx.create_entity().unwrap();
    ctx.allocate_component(e1, c).unwrap();

    let snapshot = ctx.select_entities_by_components(&[c]).unwrap();

    let e2 = ctx.create_entity().unwrap();
    ctx.allocate_component(e2, c).unwrap();
    ctx.destroy_entity(e1).unwrap();

    // The snapshot is stale relative to the store but unchanged as a value.
    assert_eq!(snapshot.entities(), &[e1]);
}

#[test]
fn destroying_an_entity_updates_subsequent_queries() {
    let mut ctx = Context::new();
    let c = ctx.register_storage(&StorageParams::new(4)).unwrap();
    let e1 = ctx.create_entity().unwrap();
    let e2 = ctx.create_entity().unwrap();
    ctx.allocate_component(e1, c).unwrap();
    ctx.allocate_component(e2, c).unwrap();

    ctx.select_entities_by_components(&[c]).unwrap();
    ctx.destroy_entity(e1).unwrap();

    let selection = ctx.select_entities_by_components(&[c]).unwrap();
    assert_eq!(selection.entities(), &[e2]);
}

// =============================================================================
// Selection Handles
// =============================================================================

#[test]
fn selections_must_be_released_exactly_once() {
    let mut ctx = Context::new();
    let c = ctx.register_storage(&StorageParams::new(4)).unwrap();
    let e = ctx.create_entity().unwrap();
    ctx.allocate_component(e, c).unwrap();

    let selection = ctx.select_entities_by_components(&[c]).unwrap();
    assert!(ctx.free_entity_selection(selection.handle()));
    assert!(!ctx.free_entity_selection(selection.handle()));
}

#[test]
fn distinct_queries_get_distinct_handles() {
    let mut ctx = Context::new();
    let a = ctx.register_storage(&StorageParams::new(4)).unwrap();
    let b = ctx.register_storage(&StorageParams::new(4)).unwrap();

    let sa = ctx.select_entities_by_components(&[a]).unwrap();
    let sb = ctx.select_entities_by_components(&[b]).unwrap();
    assert_ne!(sa.handle(), sb.handle());
}
