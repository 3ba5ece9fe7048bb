//! Recycling identifier allocator with smallest-first reuse.
//!
//! Identifiers double as dense array indices elsewhere in the store, so the
//! pool always hands out the smallest free identifier. That bounds the
//! maximum outstanding identifier, and with it the memory footprint of
//! anything indexed by pool ids.

use std::collections::BTreeSet;

use relic_foundation::IdExhausted;

/// Allocates and recycles dense `u64` identifiers.
///
/// An identifier is unique among currently reserved identifiers of the same
/// pool and is reused only after being freed. Reuse is smallest-first: a
/// freed identifier is returned by [`IdPool::next_available`] only once every
/// smaller free identifier has been returned. The free set is kept sorted
/// rather than stacked to satisfy that ordering.
///
/// `u64::MAX` is reserved as the null sentinel for handles built on pool ids
/// and is never allocatable.
#[derive(Debug, Clone, Default)]
pub struct IdPool {
    /// Identifiers at or above this mark have never been handed out.
    next_unused: u64,
    /// Freed or skipped-over identifiers below the mark, kept sorted.
    free: BTreeSet<u64>,
}

impl IdPool {
    /// Creates a new pool with every identifier free.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves and returns the smallest free identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdExhausted`] once every identifier below the sentinel has
    /// been reserved.
    pub fn next_available(&mut self) -> Result<u64, IdExhausted> {
        if let Some(&id) = self.free.iter().next() {
            self.free.remove(&id);
            return Ok(id);
        }
        if self.next_unused == u64::MAX {
            return Err(IdExhausted);
        }
        let id = self.next_unused;
        self.next_unused += 1;
        Ok(id)
    }

    /// Returns true if the identifier is currently free.
    ///
    /// Pure predicate, no side effect. The sentinel is never free.
    #[must_use]
    pub fn is_free(&self, id: u64) -> bool {
        if id == u64::MAX {
            return false;
        }
        id >= self.next_unused || self.free.contains(&id)
    }

    /// Attempts to reserve a caller-chosen identifier.
    ///
    /// Returns false, with no state change, if the identifier is already
    /// reserved or is the sentinel. Reserving past the high-water mark
    /// leaves every skipped intermediate identifier free.
    pub fn reserve(&mut self, id: u64) -> bool {
        if !self.is_free(id) {
            return false;
        }
        if id < self.next_unused {
            self.free.remove(&id);
        } else {
            self.free.extend(self.next_unused..id);
            self.next_unused = id + 1;
        }
        true
    }

    /// Returns an identifier to the free set.
    ///
    /// A later [`IdPool::next_available`] may return it, but not before all
    /// smaller free identifiers have been returned first. Freeing an
    /// already-free identifier (or the sentinel) is a no-op.
    pub fn free(&mut self, id: u64) {
        if id < self.next_unused {
            self.free.insert(id);
        }
    }

    /// Returns the number of currently reserved identifiers.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn len(&self) -> usize {
        (self.next_unused - self.free.len() as u64) as usize
    }

    /// Returns true if no identifiers are reserved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all reserved identifiers in ascending order.
    pub fn iter_reserved(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.next_unused).filter(move |id| !self.free.contains(id))
    }

    /// Frees every identifier, resetting the pool.
    pub fn clear(&mut self) {
        self.next_unused = 0;
        self.free.clear();
    }
}
