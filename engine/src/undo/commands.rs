//! Reversible edit commands

use super::state::{ComponentKind, ComponentState};
use crate::core::entity::{EcsError, Entity};
use crate::scene::Scene;
use tracing::{error, warn};

/// A recorded component edit with its inverse
///
/// Constructors snapshot whatever prior state the inverse needs, so
/// [`Command::unexecute`] exactly undoes [`Command::execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddComponent {
        entity: Entity,
        state: ComponentState,
    },
    RemoveComponent {
        entity: Entity,
        /// Value at the time of removal, restored on undo
        state: ComponentState,
    },
    ChangeComponentState {
        entity: Entity,
        before: ComponentState,
        after: ComponentState,
    },
}

impl Command {
    /// Add a component that the entity does not have yet
    pub fn add_component(scene: &Scene, entity: Entity, state: ComponentState) -> Result<Self, EcsError> {
        if !scene.contains(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
        let kind = state.kind();
        if kind.is_present(scene, entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: kind.component_name(),
            });
        }
        Ok(Self::AddComponent { entity, state })
    }

    /// Remove a component the entity currently has
    pub fn remove_component(scene: &Scene, entity: Entity, kind: ComponentKind) -> Result<Self, EcsError> {
        let state = ComponentState::capture(scene, entity, kind)?;
        Ok(Self::RemoveComponent { entity, state })
    }

    /// Replace a component's value with `after`
    ///
    /// # Arguments
    /// * `scene` - Scene the command will run against
    /// * `entity` - Entity whose component changes
    /// * `after` - New value; a transform target is resolved so the command
    ///   also records where the entity's descendants end up
    pub fn change_component_state(
        scene: &Scene,
        entity: Entity,
        after: ComponentState,
    ) -> Result<Self, EcsError> {
        let before = ComponentState::capture(scene, entity, after.kind())?;
        let after = after.resolve(scene, entity)?;
        Ok(Self::ChangeComponentState {
            entity,
            before,
            after,
        })
    }

    /// Change command whose prior state was captured by the caller
    ///
    /// Used when the edit already happened live (a gizmo drag) and only needs
    /// recording. Both states should come from [`ComponentState::capture`] so
    /// descendants are restored too.
    pub fn from_states(entity: Entity, before: ComponentState, after: ComponentState) -> Option<Self> {
        (before.kind() == after.kind()).then_some(Self::ChangeComponentState {
            entity,
            before,
            after,
        })
    }

    pub fn entity(&self) -> Entity {
        match self {
            Self::AddComponent { entity, .. }
            | Self::RemoveComponent { entity, .. }
            | Self::ChangeComponentState { entity, .. } => *entity,
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::AddComponent { state, .. } | Self::RemoveComponent { state, .. } => state.kind(),
            Self::ChangeComponentState { after, .. } => after.kind(),
        }
    }

    /// Apply the edit; returns false when it degraded to a no-op
    pub fn execute(&self, scene: &mut Scene) -> bool {
        if !self.target_alive(scene) {
            return false;
        }
        let result = match self {
            Self::AddComponent { entity, state } => state.apply(scene, *entity),
            Self::RemoveComponent { entity, state } => {
                state.kind().remove(scene, *entity);
                Ok(())
            }
            Self::ChangeComponentState { entity, after, .. } => after.apply(scene, *entity),
        };
        self.report(result)
    }

    /// Revert the edit; returns false when it degraded to a no-op
    pub fn unexecute(&self, scene: &mut Scene) -> bool {
        if !self.target_alive(scene) {
            return false;
        }
        let result = match self {
            Self::AddComponent { entity, state } => {
                state.kind().remove(scene, *entity);
                Ok(())
            }
            Self::RemoveComponent { entity, state } => state.apply(scene, *entity),
            Self::ChangeComponentState { entity, before, .. } => before.apply(scene, *entity),
        };
        self.report(result)
    }

    fn target_alive(&self, scene: &Scene) -> bool {
        let alive = scene.contains(self.entity());
        if !alive {
            warn!(
                entity = %self.entity(),
                kind = ?self.kind(),
                "Command target no longer exists, skipping"
            );
        }
        alive
    }

    fn report(&self, result: Result<(), EcsError>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                error!(entity = %self.entity(), kind = ?self.kind(), error = %err, "Command failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{NameComponent, Parent, TransformComponent};
    use crate::core::light::{LightComponent, LightType};
    use crate::undo::TransformState;
    use glam::Vec3;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    /// Root at the origin with one child at (1, 2, 3)
    fn scene_with_child() -> (Scene, Entity, Entity) {
        let mut scene = Scene::default();
        let root = scene.create_entity();
        scene.add(root, TransformComponent::default()).unwrap();
        let child = scene.create_entity();
        scene
            .add(child, TransformComponent::from_position(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        scene.add(child, Parent(root)).unwrap();
        (scene, root, child)
    }

    fn scene_with_entity() -> (Scene, Entity) {
        let mut scene = Scene::default();
        let entity = scene.create_entity();
        scene.add(entity, NameComponent::new("Thing")).unwrap();
        scene.add(entity, TransformComponent::default()).unwrap();
        (scene, entity)
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let (scene, entity) = scene_with_entity();
        let result = Command::add_component(
            &scene,
            entity,
            ComponentState::Name(NameComponent::new("Other")),
        );
        assert!(matches!(result, Err(EcsError::DuplicateComponent { .. })));
    }

    #[test]
    fn test_add_and_undo() {
        let (mut scene, entity) = scene_with_entity();
        let command = Command::add_component(
            &scene,
            entity,
            ComponentState::Light(LightComponent::new(LightType::Spot)),
        )
        .unwrap();

        assert!(command.execute(&mut scene));
        assert!(scene.has::<LightComponent>(entity));
        assert!(command.unexecute(&mut scene));
        assert!(!scene.has::<LightComponent>(entity));
    }

    #[test]
    fn test_remove_restores_value() {
        let (mut scene, entity) = scene_with_entity();
        scene.translate(entity, Vec3::new(4.0, 0.0, 0.0), true).unwrap();
        let command = Command::remove_component(&scene, entity, ComponentKind::Transform).unwrap();

        command.execute(&mut scene);
        assert!(!scene.has::<TransformComponent>(entity));
        command.unexecute(&mut scene);
        assert_eq!(
            scene.get::<TransformComponent>(entity).unwrap().position(),
            Vec3::new(4.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_change_state_is_invertible() {
        let (mut scene, entity) = scene_with_entity();
        let command = Command::change_component_state(
            &scene,
            entity,
            ComponentState::Name(NameComponent::new("Renamed")),
        )
        .unwrap();

        command.execute(&mut scene);
        assert_eq!(scene.get::<NameComponent>(entity).unwrap().as_str(), "Renamed");
        command.unexecute(&mut scene);
        assert_eq!(scene.get::<NameComponent>(entity).unwrap().as_str(), "Thing");
    }

    #[test]
    fn test_multi_axis_rotation_undo_restores_child() {
        let (mut scene, root, child) = scene_with_child();
        let target = TransformComponent::new(Vec3::ZERO, Vec3::new(30.0, 45.0, 60.0), Vec3::ONE);
        let command =
            Command::change_component_state(&scene, root, ComponentState::Transform(target.into())).unwrap();

        command.execute(&mut scene);
        let moved = scene.get::<TransformComponent>(child).unwrap().position();
        assert!(!approx(moved, Vec3::new(1.0, 2.0, 3.0)));

        command.unexecute(&mut scene);
        let child_transform = scene.get::<TransformComponent>(child).unwrap();
        assert_eq!(child_transform.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(child_transform.rotation(), Vec3::ZERO);

        // Redo lands exactly where the first execution did
        command.execute(&mut scene);
        assert_eq!(scene.get::<TransformComponent>(child).unwrap().position(), moved);
    }

    #[test]
    fn test_zero_size_undo_restores_child() {
        let (mut scene, root, child) = scene_with_child();
        let target = TransformComponent::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0));
        let command =
            Command::change_component_state(&scene, root, ComponentState::Transform(target.into())).unwrap();

        command.execute(&mut scene);
        let collapsed = scene.get::<TransformComponent>(child).unwrap();
        assert_eq!(collapsed.size(), Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(collapsed.position(), Vec3::new(0.0, 2.0, 3.0));

        command.unexecute(&mut scene);
        let restored = scene.get::<TransformComponent>(child).unwrap();
        assert_eq!(restored.size(), Vec3::ONE);
        assert_eq!(restored.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.get::<TransformComponent>(root).unwrap().size(), Vec3::ONE);
    }

    #[test]
    fn test_recorded_states_restore_descendants() {
        let (mut scene, root, child) = scene_with_child();
        let before = ComponentState::capture(&scene, root, ComponentKind::Transform).unwrap();
        scene.set_rotation(root, Vec3::new(10.0, 20.0, 30.0), true).unwrap();
        let after = ComponentState::capture(&scene, root, ComponentKind::Transform).unwrap();
        let command = Command::from_states(root, before, after).unwrap();

        command.unexecute(&mut scene);
        assert_eq!(
            scene.get::<TransformComponent>(child).unwrap().position(),
            Vec3::new(1.0, 2.0, 3.0)
        );
        let ComponentState::Transform(TransformState { descendants, .. }) =
            ComponentState::capture(&scene, root, ComponentKind::Transform).unwrap()
        else {
            unreachable!();
        };
        assert_eq!(descendants.len(), 1);
    }

    #[test]
    fn test_destroyed_target_is_noop() {
        let (mut scene, entity) = scene_with_entity();
        let command = Command::remove_component(&scene, entity, ComponentKind::Name).unwrap();
        scene.destroy_entity(entity).unwrap();

        assert!(!command.execute(&mut scene));
        assert!(!command.unexecute(&mut scene));
    }

    #[test]
    fn test_from_states_requires_same_kind() {
        let entity = Entity::null();
        assert!(Command::from_states(
            entity,
            ComponentState::Name(NameComponent::new("a")),
            ComponentState::Script("b".into()),
        )
        .is_none());
    }
}
