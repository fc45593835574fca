//! Identity-keyed open-addressing hash set.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::runtime::ObjectId;

const MIN_CAPACITY: usize = 8;

/// Set of object identities used to mark visited objects.
///
/// Linear probing over a power-of-two table. The table doubles before an
/// insert would take the load above 5/6 of its capacity.
#[derive(Debug, Clone)]
pub struct IdentitySet {
    slots: Vec<Option<ObjectId>>,
    len: usize,
}

impl IdentitySet {
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Create a set with at least `capacity` buckets (rounded up to a power of two).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY).next_power_of_two();
        Self {
            slots: vec![None; capacity],
            len: 0,
        }
    }

    /// Add `id`. Returns true iff it was not already present.
    pub fn insert(&mut self, id: ObjectId) -> bool {
        let idx = self.probe(id);
        if self.slots[idx].is_some() {
            return false;
        }
        if exceeds_load_factor(self.len + 1, self.slots.len()) {
            self.grow();
            let idx = self.probe(id);
            self.slots[idx] = Some(id);
        } else {
            self.slots[idx] = Some(id);
        }
        self.len += 1;
        true
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.slots[self.probe(id)].is_some()
    }

    /// Forget every identity, keeping the allocated table.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets in the table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the bucket holding `id`, or of the empty bucket where it
    /// would be placed. The load factor guarantees an empty bucket exists.
    fn probe(&self, id: ObjectId) -> usize {
        let mask = self.slots.len() - 1;
        let mut idx = bucket_of(id) & mask;
        loop {
            match self.slots[idx] {
                Some(existing) if existing != id => idx = (idx + 1) & mask,
                _ => return idx,
            }
        }
    }

    fn grow(&mut self) {
        let new_capacity = self.slots.len() * 2;
        let old = std::mem::replace(&mut self.slots, vec![None; new_capacity]);
        for id in old.into_iter().flatten() {
            let idx = self.probe(id);
            self.slots[idx] = Some(id);
        }
    }
}

impl Default for IdentitySet {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn exceeds_load_factor(len: usize, capacity: usize) -> bool {
    len * 6 > capacity * 5
}

#[inline]
fn bucket_of(id: ObjectId) -> usize {
    let mut hasher = FxHasher::default();
    hasher.write_usize(id.get());
    hasher.finish() as usize
}
