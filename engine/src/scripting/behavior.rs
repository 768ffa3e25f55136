//! Per-entity behaviour hooks

use crate::core::entity::{ComponentStore, Entity};

/// What a behaviour can see while it runs
pub struct BehaviorContext<'a> {
    pub entity: Entity,
    pub store: &'a mut ComponentStore,
    /// Seconds since the previous frame
    pub delta_time: f32,
}

/// User script attached to an entity
///
/// `start` runs once before the first `update` after the scene starts
/// running; `update` runs every frame while the scene is not being edited.
pub trait Behavior: 'static {
    fn start(&mut self, _ctx: &mut BehaviorContext<'_>) {}

    fn update(&mut self, ctx: &mut BehaviorContext<'_>);

    /// Logical name the behaviour was registered under
    fn name(&self) -> &str;
}

/// Behaviour that does nothing; bound when a script cannot be resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoopBehavior;

impl Behavior for NoopBehavior {
    fn update(&mut self, _ctx: &mut BehaviorContext<'_>) {}

    fn name(&self) -> &str {
        "NoopBehavior"
    }
}

impl std::fmt::Debug for dyn Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Behavior").field(&self.name()).finish()
    }
}
