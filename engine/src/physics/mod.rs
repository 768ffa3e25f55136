//! Physics bridge
//!
//! A small rigid-body world plus the component and systems that keep it in
//! step with entity transforms.

pub mod collision;
pub mod components;
pub mod system;
pub mod world;

// Re-export commonly used types
pub use collision::ColliderShape;
pub use components::{ColliderType, PhysicsComponent};
pub use system::{pull_transforms, push_transform};
pub use world::{PhysicsWorld, RigidBody, RigidBodyHandle};
