//! Entity-Component System (ECS) functionality
//!
//! Generational entity handles, a sparse-set component store, the core
//! components and transform propagation through parent links.

pub mod components;
#[allow(clippy::module_inception)]
pub mod entity;
pub mod hierarchy;
pub mod storage;
pub mod world;

// Re-export commonly used types
pub use components::{
    CreationTypeComponent, EntityCreationType, NameComponent, Parent, TransformComponent,
};
pub use entity::{Entity, EntityAllocator, EntityKey, SceneId};
pub use hierarchy::{
    apply_transform_edit, children_of, descendants, preview_transform_edits, TransformEdit,
};
pub use storage::{AnyStorage, SparseSet};
pub use world::ComponentStore;

use thiserror::Error;

/// Errors raised by component store access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The handle is null, destroyed or belongs to another scene
    #[error("invalid entity {0}")]
    InvalidEntity(Entity),

    #[error("{entity} has no {component}")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("{entity} already has a {component}")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },
}
