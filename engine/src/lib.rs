//! Scene engine for a 3D editor
//!
//! This crate provides the entity store, transform hierarchy, rigid-body
//! simulation, behaviour scripting, scene persistence and command-based
//! undo/redo used by the editor.

// Lets `#[derive(Component)]` resolve `::engine::...` inside this crate
extern crate self as engine;

pub mod component_system;
pub mod config;
pub mod core;
pub mod graphics;
pub mod io;
pub mod physics;
pub mod scene;
pub mod scripting;
pub mod shaders;
pub mod undo;

// Re-export commonly used types
pub mod prelude {
    // Entity types
    pub use crate::core::entity::{
        CreationTypeComponent, EcsError, Entity, EntityCreationType, NameComponent, Parent,
        TransformComponent, TransformEdit,
    };

    // Camera, light and audio types
    pub use crate::core::camera::{CameraComponent, DebugCamera, ProjectionType};
    pub use crate::core::audio::AudioComponent;
    pub use crate::core::light::{LightComponent, LightType};

    // Math types
    pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

    // Graphics types
    pub use crate::graphics::{
        Material, MeshComponent, MeshRendererComponent, RenderBackend, TextureSpecification,
    };

    // Scene types
    pub use crate::scene::{shape, Scene, SceneState};

    // IO types
    pub use crate::io::{EntityMapper, ModelLoader, SceneDocument, SceneError, SceneSerializer};

    // Config types
    pub use crate::config::{AssetConfig, EngineConfig};

    // Scripting types
    pub use crate::scripting::{Behavior, BehaviorContext, BehaviorLoader, ScriptComponent};

    // Physics types
    pub use crate::physics::{ColliderType, PhysicsComponent, PhysicsWorld};

    // Undo types
    pub use crate::undo::{Command, CommandStack, ComponentState, TransformState};
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
