//! Relic - In-memory entity/component relational store
//!
//! This crate re-exports both layers of the Relic system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: relic_storage    — Identifier pool, arenas, relational index, context
//! Layer 0: relic_foundation — Handle types (Entity, ComponentTypeId), error taxonomy
//! ```

pub use relic_foundation as foundation;
pub use relic_storage as storage;
