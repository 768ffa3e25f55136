//! Script behaviours
//!
//! Entities carry a [`ScriptComponent`] naming a behaviour. The name is
//! looked up in the scene's [`ScriptDllRegistry`] and constructed through a
//! [`BehaviorLoader`]; anything that cannot be resolved runs as a no-op.

pub mod behavior;
pub mod components;
pub mod loader;
pub mod registry;

pub use behavior::{Behavior, BehaviorContext, NoopBehavior};
pub use components::ScriptComponent;
pub use loader::{bind_behavior, resolve_behavior, BehaviorLoader, FactoryBehaviorLoader, ScriptBindError};
pub use registry::{ScriptDllDescriptor, ScriptDllRegistry};
