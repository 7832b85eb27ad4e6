//! Sparse-set component storage
//!
//! Each pool keeps two parallel dense arrays (values and their owning
//! entities) plus a sparse index array addressed by entity id:
//!
//! - `sparse[id]` -> slot in `dense`, or `EMPTY` when the id is absent
//! - `dense[slot]` -> packed component value
//! - `dense_entities[slot]` -> entity that owns `dense[slot]`
//!
//! Insert, remove and lookup are O(1). Removal swaps the removed slot with
//! the last one, so dense order changes and must never be used for identity.

use super::EntityId;

/// Marks a sparse entry with no dense slot
const EMPTY: usize = usize::MAX;

/// Packed storage mapping [`EntityId`] to values of `T`
#[derive(Debug, Clone)]
pub struct SparseSet<T> {
    sparse: Vec<usize>,
    dense: Vec<T>,
    dense_entities: Vec<EntityId>,
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseSet<T> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            dense_entities: Vec::new(),
        }
    }

    /// Insert `value` for `entity`
    ///
    /// Returns `false` and leaves the existing value untouched when the
    /// entity is already present.
    pub fn insert(&mut self, entity: EntityId, value: T) -> bool {
        if self.contains(entity) {
            return false;
        }

        let index = entity.index();
        if self.sparse.len() <= index {
            self.sparse.resize(index + 1, EMPTY);
        }

        self.sparse[index] = self.dense.len();
        self.dense.push(value);
        self.dense_entities.push(entity);
        true
    }

    /// Remove the value owned by `entity`, returning it
    pub fn take(&mut self, entity: EntityId) -> Option<T> {
        let slot = self.slot(entity)?;

        // swap_remove moves the last slot into `slot`; repoint its owner
        let value = self.dense.swap_remove(slot);
        self.dense_entities.swap_remove(slot);
        if let Some(&moved) = self.dense_entities.get(slot) {
            self.sparse[moved.index()] = slot;
        }

        self.sparse[entity.index()] = EMPTY;
        while self.sparse.last() == Some(&EMPTY) {
            self.sparse.pop();
        }

        Some(value)
    }

    /// Remove the value owned by `entity`
    ///
    /// Returns `false` when the entity was not present.
    pub fn remove(&mut self, entity: EntityId) -> bool {
        self.take(entity).is_some()
    }

    /// Check whether `entity` has a value in this set
    pub fn contains(&self, entity: EntityId) -> bool {
        self.slot(entity).is_some()
    }

    /// Borrow the value owned by `entity`
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not present. Check [`Self::contains`] first or
    /// use [`Self::try_get`].
    pub fn get(&self, entity: EntityId) -> &T {
        match self.try_get(entity) {
            Some(value) => value,
            None => panic!("sparse set has no value for entity {entity}"),
        }
    }

    /// Mutably borrow the value owned by `entity`
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not present.
    pub fn get_mut(&mut self, entity: EntityId) -> &mut T {
        match self.try_get_mut(entity) {
            Some(value) => value,
            None => panic!("sparse set has no value for entity {entity}"),
        }
    }

    /// Borrow the value owned by `entity`, if any
    pub fn try_get(&self, entity: EntityId) -> Option<&T> {
        self.slot(entity).map(|slot| &self.dense[slot])
    }

    /// Mutably borrow the value owned by `entity`, if any
    pub fn try_get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.slot(entity).map(|slot| &mut self.dense[slot])
    }

    /// Number of values stored
    pub fn len(&self) -> usize {
        self.dense_entities.len()
    }

    /// Whether the set holds no values
    pub fn is_empty(&self) -> bool {
        self.dense_entities.is_empty()
    }

    /// Entities present, in dense order
    pub fn ids(&self) -> &[EntityId] {
        &self.dense_entities
    }

    /// Packed values, in dense order
    pub fn values(&self) -> &[T] {
        &self.dense
    }

    /// Packed values, in dense order
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// Iterate `(entity, value)` pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.dense_entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterate `(entity, value)` pairs mutably in dense order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.dense_entities.iter().copied().zip(self.dense.iter_mut())
    }

    /// Drop every value
    pub fn clear(&mut self) {
        self.sparse.clear();
        self.dense.clear();
        self.dense_entities.clear();
    }

    /// Length of the sparse index array
    #[cfg(test)]
    pub(crate) fn sparse_len(&self) -> usize {
        self.sparse.len()
    }

    fn slot(&self, entity: EntityId) -> Option<usize> {
        match self.sparse.get(entity.index()) {
            Some(&slot) if slot != EMPTY => Some(slot),
            _ => None,
        }
    }
}
