//! Single-pass uniform reservoir sampling with keyed lookup.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Gives an item a lookup key for merge-by-key semantics.
///
/// The key must stay stable for the lifetime of the item inside a
/// reservoir: callers obtaining an item through [`ReservoirSampler::find_mut`]
/// may mutate its payload but never its key.
pub trait Keyed {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
}

impl Keyed for String {
    type Key = String;

    fn key(&self) -> String {
        self.clone()
    }
}

/// Fixed-capacity uniform random sample of a stream (Algorithm R).
///
/// After `n >= capacity` observations, every observed item is present
/// with probability `capacity / n`; below capacity all items are held.
/// An auxiliary key-to-slot index provides amortized O(1) lookup so
/// repeat sightings of the same key can be merged into the existing item
/// instead of inserting a duplicate and risking eviction splitting one
/// key's data across two entries.
///
/// Single-writer by design: the sampling phase runs on one thread, so no
/// internal synchronization is carried. Callers that rely on [`find`]
/// must merge-by-key before observing; observing two items with an equal
/// key leaves the index pointing at the latest slot.
///
/// [`find`]: ReservoirSampler::find
#[derive(Debug)]
pub struct ReservoirSampler<T: Keyed> {
    capacity: usize,
    items: Vec<T>,
    index: HashMap<T::Key, usize>,
    seen: u64,
    rng: StdRng,
}

impl<T: Keyed> ReservoirSampler<T> {
    /// Creates a reservoir holding at most `capacity` items, seeded from
    /// the operating system.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::with_rng(capacity, StdRng::from_os_rng())
    }

    /// Creates a reservoir with an explicit RNG. Used by tests that need
    /// reproducible replacement decisions.
    pub fn with_rng(capacity: NonZeroUsize, rng: StdRng) -> Self {
        let capacity = capacity.get();
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            seen: 0,
            rng,
        }
    }

    /// Observes one stream item.
    ///
    /// Below capacity the item is appended. At capacity it replaces a
    /// uniformly chosen slot with probability `capacity / seen`, where
    /// `seen` counts every call regardless of whether a replacement
    /// happened. Eviction is a wholesale O(1) slot overwrite: the evicted
    /// item's index entry is dropped together with the item.
    pub fn observe(&mut self, item: T) {
        self.seen += 1;

        if self.items.len() < self.capacity {
            self.index.insert(item.key(), self.items.len());
            self.items.push(item);
            return;
        }

        let j = self.rng.random_range(0..self.seen);
        if (j as usize) < self.capacity {
            let slot = j as usize;
            self.index.remove(&self.items[slot].key());
            self.index.insert(item.key(), slot);
            self.items[slot] = item;
        }
    }

    /// Looks up an item by key. Amortized O(1).
    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.index.get(key).map(|&slot| &self.items[slot])
    }

    /// Mutable keyed lookup, for merging repeat sightings into the
    /// existing item. The item's key must not be changed through the
    /// returned reference.
    pub fn find_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.index.get(key).map(|&slot| &mut self.items[slot])
    }

    /// Snapshot iteration over the currently held sample. Each call
    /// starts a fresh iterator.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Number of items currently held (at most `capacity`).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of observations so far, including evicted ones.
    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
