//! Sparse-set storage, one instance per component type

use super::entity::Entity;
use crate::component_system::Component;
use std::any::Any;

/// Dense storage for a single component type
///
/// `sparse` is indexed by entity slot and points into the dense arrays.
/// Removal swaps the last element into the hole, so iteration order is
/// stable only until the next structural change.
#[derive(Debug)]
pub struct SparseSet<T> {
    sparse: Vec<Option<u32>>,
    dense: Vec<Entity>,
    data: Vec<T>,
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
            data: Vec::new(),
        }
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        let dense = (*self.sparse.get(entity.index() as usize)?)? as usize;
        (self.dense[dense] == entity).then_some(dense)
    }

    /// Insert or replace the value for an entity, returning the previous value
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(dense) = self.dense_index(entity) {
            return Some(std::mem::replace(&mut self.data[dense], value));
        }

        let slot = entity.index() as usize;
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, None);
        }
        // A stale handle in the same slot is dropped in favour of the new one
        if let Some(stale) = self.sparse[slot] {
            let stale_entity = self.dense[stale as usize];
            self.remove(stale_entity);
        }
        self.sparse[slot] = Some(self.dense.len() as u32);
        self.dense.push(entity);
        self.data.push(value);
        None
    }

    /// Insert a value for an entity known not to hold one, returning it
    pub(crate) fn push_new(&mut self, entity: Entity, value: T) -> &mut T {
        self.insert(entity, value);
        let dense = self.data.len() - 1;
        &mut self.data[dense]
    }

    /// Remove the value for an entity
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let dense = self.dense_index(entity)?;
        self.sparse[entity.index() as usize] = None;
        let last = self.dense.len() - 1;
        if dense != last {
            let moved = self.dense[last];
            self.sparse[moved.index() as usize] = Some(dense as u32);
        }
        self.dense.swap_remove(dense);
        Some(self.data.swap_remove(dense))
    }

    /// Get the value for an entity
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.dense_index(entity).map(|dense| &self.data[dense])
    }

    /// Get the value for an entity mutably
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.dense_index(entity).map(|dense| &mut self.data[dense])
    }

    /// Whether the entity holds a value
    pub fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Entities holding a value, in dense order
    pub fn entities(&self) -> &[Entity] {
        &self.dense
    }

    /// Iterate over `(entity, value)` pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.dense.iter().copied().zip(self.data.iter())
    }

    /// Iterate mutably over `(entity, value)` pairs in dense order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.dense.iter().copied().zip(self.data.iter_mut())
    }

    /// Remove every value
    pub fn clear(&mut self) {
        self.sparse.clear();
        self.dense.clear();
        self.data.clear();
    }
}

/// Type-erased view of a `SparseSet`, used by the store's type-indexed registry
pub trait AnyStorage {
    /// Remove whatever the entity holds in this storage
    fn remove_entity(&mut self, entity: Entity);
    /// Whether the entity holds a value in this storage
    fn contains_entity(&self, entity: Entity) -> bool;
    /// Remove every value
    fn clear(&mut self);
    /// Number of stored values
    fn len(&self) -> usize;
    /// Persisted name of the stored component type
    fn component_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStorage for SparseSet<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(entity);
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn clear(&mut self) {
        SparseSet::clear(self);
    }

    fn len(&self) -> usize {
        SparseSet::len(self)
    }

    fn component_name(&self) -> &'static str {
        T::component_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
