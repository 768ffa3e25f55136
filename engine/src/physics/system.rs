//! Synchronisation between transforms and rigid bodies
//!
//! Editing pushes transforms into bodies (editor wins); simulation pulls body
//! poses back into transforms (physics wins).

use super::components::PhysicsComponent;
use super::world::PhysicsWorld;
use crate::core::entity::components::{euler_degrees_to_quat, quat_to_euler_degrees};
use crate::core::entity::{ComponentStore, Entity, TransformComponent};
use tracing::trace;

/// Overwrite an entity's rigid body with its current transform
///
/// Position, rotation and collider size are all refreshed. Entities without
/// both components are left alone.
pub fn push_transform(store: &mut ComponentStore, physics: &mut PhysicsWorld, entity: Entity) {
    let Ok(transform) = store.get::<TransformComponent>(entity) else {
        return;
    };
    let (position, rotation, size) = (
        transform.position(),
        euler_degrees_to_quat(transform.rotation()),
        transform.size(),
    );
    let Ok(component) = store.get_mut::<PhysicsComponent>(entity) else {
        return;
    };
    component.set_world_transform(physics, position, rotation);
    if component.size() != size {
        component.set_size(physics, size);
    }
    trace!(entity = %entity, "Pushed transform into rigid body");
}

/// Copy simulated poses of dynamic bodies into their transforms
///
/// Static bodies never move, so their transforms are left untouched.
pub fn pull_transforms(store: &mut ComponentStore, physics: &PhysicsWorld) -> usize {
    let poses: Vec<_> = store
        .each::<PhysicsComponent>()
        .filter(|(_, component)| !component.is_static())
        .filter_map(|(entity, component)| {
            component
                .world_transform(physics)
                .map(|pose| (entity, pose))
        })
        .collect();

    let mut updated = 0;
    for (entity, (position, rotation)) in poses {
        if let Ok(transform) = store.get_mut::<TransformComponent>(entity) {
            transform.set_position(position);
            transform.set_rotation(quat_to_euler_degrees(rotation));
            updated += 1;
        }
    }
    trace!(updated, "Pulled rigid body poses into transforms");
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::SceneId;
    use crate::physics::ColliderType;
    use glam::{Quat, Vec3};

    fn spawn(store: &mut ComponentStore, physics: &mut PhysicsWorld, mass: f32) -> Entity {
        let entity = store.create();
        store
            .add(entity, TransformComponent::from_position(Vec3::new(0.0, 5.0, 0.0)))
            .unwrap();
        let component = PhysicsComponent::new(
            physics,
            ColliderType::Box,
            Vec3::ONE,
            Vec3::ONE,
            Vec3::new(0.0, 5.0, 0.0),
            Quat::IDENTITY,
            mass,
        );
        store.add(entity, component).unwrap();
        entity
    }

    #[test]
    fn test_push_overwrites_body() {
        let mut store = ComponentStore::new(SceneId::next());
        let mut physics = PhysicsWorld::default();
        let entity = spawn(&mut store, &mut physics, 1.0);

        let transform = store.get_mut::<TransformComponent>(entity).unwrap();
        transform.set_position(Vec3::X);
        transform.set_size(Vec3::splat(2.0));
        push_transform(&mut store, &mut physics, entity);

        let component = store.get::<PhysicsComponent>(entity).unwrap();
        assert_eq!(component.world_transform(&physics).unwrap().0, Vec3::X);
        assert_eq!(component.size(), Vec3::splat(2.0));
    }

    #[test]
    fn test_pull_moves_only_dynamic_bodies() {
        let mut store = ComponentStore::new(SceneId::next());
        let mut physics = PhysicsWorld::default();
        let dynamic = spawn(&mut store, &mut physics, 1.0);
        let fixed = spawn(&mut store, &mut physics, 0.0);

        physics.step(0.5);
        assert_eq!(pull_transforms(&mut store, &physics), 1);

        assert!(store.get::<TransformComponent>(dynamic).unwrap().position().y < 5.0);
        assert_eq!(
            store.get::<TransformComponent>(fixed).unwrap().position(),
            Vec3::new(0.0, 5.0, 0.0)
        );
    }
}
