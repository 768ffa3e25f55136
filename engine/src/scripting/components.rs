//! Script-related components

use super::behavior::{Behavior, NoopBehavior};
use crate::component_system::Component;

/// Behaviour attached to an entity
///
/// Only `behavior_name` is persisted; the instance is rebound through the
/// script registry whenever the scene is loaded or scripts are revalidated.
#[derive(Debug, Component)]
#[component(name = "ScriptComponent")]
pub struct ScriptComponent {
    pub behavior_name: String,
    pub behavior: Box<dyn Behavior>,
    /// Whether `start` has run for the current play session
    pub started: bool,
}

impl ScriptComponent {
    pub fn new(behavior_name: impl Into<String>, behavior: Box<dyn Behavior>) -> Self {
        Self {
            behavior_name: behavior_name.into(),
            behavior,
            started: false,
        }
    }

    /// Script with a name but no resolved behaviour yet
    pub fn unbound(behavior_name: impl Into<String>) -> Self {
        Self::new(behavior_name, Box::new(NoopBehavior))
    }

    /// Swap in a freshly resolved behaviour
    pub fn rebind(&mut self, behavior: Box<dyn Behavior>) {
        self.behavior = behavior;
        self.started = false;
    }
}
