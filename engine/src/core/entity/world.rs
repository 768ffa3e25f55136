//! Component store owning entity allocation and one sparse set per component type

use super::entity::{Entity, EntityAllocator, SceneId};
use super::storage::{AnyStorage, SparseSet};
use super::EcsError;
use crate::component_system::Component;
use std::any::TypeId;
use std::collections::HashMap;
use tracing::debug;

/// Type-indexed registry of component storages
///
/// Every typed access validates the entity handle first, so operations on a
/// destroyed or foreign entity fail with `EcsError::InvalidEntity` instead of
/// touching an unrelated row.
pub struct ComponentStore {
    entities: EntityAllocator,
    storages: HashMap<TypeId, Box<dyn AnyStorage>>,
}

impl ComponentStore {
    /// Create an empty store issuing handles for the given scene
    pub fn new(scene: SceneId) -> Self {
        Self {
            entities: EntityAllocator::new(scene),
            storages: HashMap::new(),
        }
    }

    /// Scene id stamped on entities created by this store
    pub fn scene_id(&self) -> SceneId {
        self.entities.scene()
    }

    /// Create a new entity with no components
    pub fn create(&mut self) -> Entity {
        let entity = self.entities.allocate();
        debug!(entity = %entity, "Created entity");
        entity
    }

    /// Destroy an entity and every component it holds
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.check(entity)?;
        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }
        self.entities.free(entity);
        debug!(entity = %entity, "Destroyed entity");
        Ok(())
    }

    /// Whether the handle refers to a live entity
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    fn check(&self, entity: Entity) -> Result<(), EcsError> {
        if self.entities.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::InvalidEntity(entity))
        }
    }

    fn storage<T: Component>(&self) -> Option<&SparseSet<T>> {
        self.storages
            .get(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any().downcast_ref::<SparseSet<T>>())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut::<SparseSet<T>>())
    }

    fn storage_or_insert<T: Component>(&mut self) -> &mut SparseSet<T> {
        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()));
        match storage.as_any_mut().downcast_mut::<SparseSet<T>>() {
            Some(set) => set,
            None => unreachable!("storage registered under the TypeId of another type"),
        }
    }

    /// Attach a component, failing if the entity already holds one of this type
    ///
    /// # Arguments
    /// * `entity` - Live entity to attach to
    /// * `component` - The component value
    ///
    /// # Returns
    /// A mutable reference to the stored component, `InvalidEntity` for a dead
    /// handle or `DuplicateComponent` if one is already attached
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> Result<&mut T, EcsError> {
        self.check(entity)?;
        let storage = self.storage_or_insert::<T>();
        if storage.contains(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: T::component_name(),
            });
        }
        Ok(storage.push_new(entity, component))
    }

    /// Attach or replace a component, returning the previous value
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<Option<T>, EcsError> {
        self.check(entity)?;
        Ok(self.storage_or_insert::<T>().insert(entity, component))
    }

    /// Borrow a component
    ///
    /// # Returns
    /// The component, `InvalidEntity` for a dead handle or `MissingComponent`
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.check(entity)?;
        self.storage::<T>()
            .and_then(|storage| storage.get(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: T::component_name(),
            })
    }

    /// Borrow a component mutably
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.check(entity)?;
        self.storage_mut::<T>()
            .and_then(|storage| storage.get_mut(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: T::component_name(),
            })
    }

    /// Whether a live entity holds a component of this type; never fails
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.contains(entity)
            && self
                .storage::<T>()
                .is_some_and(|storage| storage.contains(entity))
    }

    /// Detach a component; a no-op when absent or when the entity is gone
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.contains(entity) {
            return None;
        }
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Iterate over every entity holding `T`
    ///
    /// Structural changes while iterating are ruled out by the shared borrow.
    pub fn each<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.storage::<T>().into_iter().flat_map(|storage| storage.iter())
    }

    /// Iterate mutably over every entity holding `T`
    pub fn each_mut<T: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.storage_mut::<T>()
            .into_iter()
            .flat_map(|storage| storage.iter_mut())
    }

    /// Entities currently holding `T`, collected so the caller may mutate afterwards
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.storage::<T>()
            .map(|storage| storage.entities().to_vec())
            .unwrap_or_default()
    }

    /// Number of entities holding `T`
    pub fn count<T: Component>(&self) -> usize {
        self.storage::<T>().map_or(0, |storage| storage.len())
    }

    /// Iterate over all live entities in slot order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.alive()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Resolve a picking id to the live entity in that slot
    pub fn entity_from_id(&self, id: i32) -> Option<Entity> {
        u32::try_from(id)
            .ok()
            .and_then(|index| self.entities.entity_at(index))
    }

    /// Names of the component types the entity holds
    pub fn component_names(&self, entity: Entity) -> Vec<&'static str> {
        if !self.contains(entity) {
            return Vec::new();
        }
        let mut names: Vec<_> = self
            .storages
            .values()
            .filter(|storage| storage.contains_entity(entity))
            .map(|storage| storage.component_name())
            .collect();
        names.sort_unstable();
        names
    }

    /// Destroy every entity and component
    pub fn clear(&mut self) {
        for storage in self.storages.values_mut() {
            storage.clear();
        }
        self.entities.clear();
        debug!("Cleared component store");
    }
}

impl std::fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentStore")
            .field("scene", &self.scene_id())
            .field("entities", &self.entity_count())
            .field("storages", &self.storages.len())
            .finish()
    }
}
