//! Entity ID mapping for scene loading

use crate::core::entity::Entity;
use std::collections::HashMap;
use tracing::debug;

/// Maps persisted entity IDs to the entities created while loading
///
/// IDs in a scene file refer to the session that saved it; after loading,
/// callers holding an old ID (a remembered selection, for example) translate
/// it through this mapper.
#[derive(Debug, Default)]
pub struct EntityMapper {
    mapping: HashMap<i64, Entity>,
}

impl EntityMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapping from a persisted ID to a new entity
    ///
    /// # Arguments
    /// * `old_id` - The `Entity ID` value from the scene file
    /// * `new_entity` - The entity created for it while loading
    pub fn register(&mut self, old_id: i64, new_entity: Entity) {
        debug!(old_id = old_id, new_entity = %new_entity, "Registering entity mapping");
        self.mapping.insert(old_id, new_entity);
    }

    /// Look up the new entity for a persisted ID
    ///
    /// # Arguments
    /// * `old_id` - The `Entity ID` value from the scene file
    ///
    /// # Returns
    /// The loaded entity, or None if the ID was not in the file
    pub fn remap(&self, old_id: i64) -> Option<Entity> {
        self.mapping.get(&old_id).copied()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Get an iterator over all (old_id, new_entity) pairs
    pub fn iter(&self) -> impl Iterator<Item = (i64, Entity)> + '_ {
        self.mapping.iter().map(|(&id, &entity)| (id, entity))
    }
}
