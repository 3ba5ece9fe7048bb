//! Identifier pool, component arenas, relational index, and context for Relic.
//!
//! This crate provides:
//! - [`IdPool`] - Recycling allocator of dense identifiers with smallest-first reuse
//! - [`EntityTable`] - Live-entity tracking with batch allocation
//! - [`ComponentArena`] - Type-erased per-component-type storage
//! - [`RelationalIndex`] - Bidirectional entity↔component index with cached selections
//! - [`Context`] - Composition root owning all of the above

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod arena;
mod context;
mod entity;
mod id_pool;
mod index;

pub use arena::{ComponentArena, ConstructFn, DestroyFn, StorageParams};
pub use context::Context;
pub use entity::EntityTable;
pub use id_pool::IdPool;
pub use index::{RelationalIndex, Selection};
