//! Entity handles and their allocator

use slotmap::{new_key_type, Key, SlotMap};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

new_key_type! {
    /// Generational key of an entity within one scene
    pub struct EntityKey;
}

/// Identifies the scene an entity handle was issued by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(u32);

impl SceneId {
    /// Id carried by the null entity; never issued to a scene
    pub const NONE: SceneId = SceneId(0);

    /// Allocate a fresh process-unique scene id
    pub fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Lightweight, non-owning entity handle
///
/// Two handles are equal only if key and owning scene both match.
/// A handle outlives its entity: once the entity is destroyed every component
/// access through the handle fails with `EcsError::InvalidEntity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    key: EntityKey,
    scene: SceneId,
}

impl Entity {
    /// The default entity, never alive in any scene
    pub fn null() -> Self {
        Self {
            key: EntityKey::null(),
            scene: SceneId::NONE,
        }
    }

    pub(crate) fn new(key: EntityKey, scene: SceneId) -> Self {
        Self { key, scene }
    }

    pub fn key(&self) -> EntityKey {
        self.key
    }

    /// Slot index of this entity
    pub fn index(&self) -> u32 {
        self.key.data().as_ffi() as u32
    }

    /// Version of the slot when this handle was issued
    pub fn generation(&self) -> u32 {
        (self.key.data().as_ffi() >> 32) as u32
    }

    /// Scene that issued this handle
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    /// Identifier written into the picking attachment of the framebuffer
    ///
    /// # Returns
    /// The slot index, or -1 for the null entity, matching the "nothing
    /// under the cursor" value.
    pub fn id(&self) -> i32 {
        if self.is_null() {
            -1
        } else {
            self.index() as i32
        }
    }

    /// Whether this is the null entity
    pub fn is_null(&self) -> bool {
        self.scene == SceneId::NONE
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.index(), self.generation())
        }
    }
}

/// Issues entity handles for one scene
#[derive(Debug)]
pub struct EntityAllocator {
    scene: SceneId,
    slots: SlotMap<EntityKey, ()>,
}

impl EntityAllocator {
    /// Create an allocator issuing handles for the given scene
    pub fn new(scene: SceneId) -> Self {
        Self {
            scene,
            slots: SlotMap::with_key(),
        }
    }

    /// Scene id stamped on issued handles
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    /// Allocate a new entity, reusing a freed slot when possible
    pub fn allocate(&mut self) -> Entity {
        let entity = Entity::new(self.slots.insert(()), self.scene);
        trace!(entity = %entity, "Allocated entity slot");
        entity
    }

    /// Free an entity; returns false if it was not alive
    pub fn free(&mut self, entity: Entity) -> bool {
        self.is_alive(entity) && self.slots.remove(entity.key).is_some()
    }

    /// Whether the handle refers to a live entity of this allocator
    pub fn is_alive(&self, entity: Entity) -> bool {
        entity.scene == self.scene && self.slots.contains_key(entity.key)
    }

    /// Resolve a picking id back to the live entity occupying that slot
    ///
    /// # Arguments
    /// * `index` - Slot index as written by [`Entity::id`]
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        self.alive().find(|entity| entity.index() == index)
    }

    /// Iterate over all live entities in slot order
    pub fn alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.keys().map(|key| Entity::new(key, self.scene))
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no entity is alive
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Free every live entity; stale handles never revive
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
