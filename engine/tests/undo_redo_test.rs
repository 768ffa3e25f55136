//! Integration tests for command-based undo/redo

use engine::core::audio::AudioComponent;
use engine::core::entity::{Entity, NameComponent, TransformComponent};
use engine::core::light::LightComponent;
use engine::graphics::Aabb;
use engine::io::{ModelData, SubMesh};
use engine::physics::{ColliderType, PhysicsComponent};
use engine::scene::{shape, Scene};
use engine::scripting::{Behavior, BehaviorContext, FactoryBehaviorLoader, ScriptComponent, ScriptDllDescriptor};
use engine::undo::{Command, CommandStack, ComponentKind, ComponentState, PhysicsState};
use glam::Vec3;
use std::rc::Rc;

struct Spin;

impl Behavior for Spin {
    fn update(&mut self, ctx: &mut BehaviorContext<'_>) {
        if let Ok(transform) = ctx.store.get_mut::<TransformComponent>(ctx.entity) {
            transform.rotate(Vec3::Y * ctx.delta_time);
        }
    }

    fn name(&self) -> &str {
        "Spin"
    }
}

fn transforms(scene: &Scene, entities: &[Entity]) -> Vec<TransformComponent> {
    entities
        .iter()
        .map(|&entity| scene.get::<TransformComponent>(entity).unwrap().clone())
        .collect()
}

#[test]
fn test_transform_edit_undo_moves_body_back() {
    let mut scene = Scene::default();
    let cube = shape::create_cube_entity(&mut scene, Vec::new()).unwrap();
    let mut stack = CommandStack::new();

    let mut moved = scene.get::<TransformComponent>(cube).unwrap().clone();
    moved.set_position(Vec3::new(0.0, 4.0, 0.0));
    let command = Command::change_component_state(&scene, cube, ComponentState::Transform(moved.into())).unwrap();
    assert!(stack.execute(&mut scene, command));

    let body_position = |scene: &Scene| {
        let physics = scene.get::<PhysicsComponent>(cube).unwrap();
        physics.world_transform(scene.physics()).unwrap().0
    };
    assert_eq!(body_position(&scene), Vec3::new(0.0, 4.0, 0.0));

    assert!(stack.undo(&mut scene));
    assert_eq!(scene.get::<TransformComponent>(cube).unwrap().position(), Vec3::ZERO);
    assert_eq!(body_position(&scene), Vec3::ZERO);

    assert!(stack.redo(&mut scene));
    assert_eq!(body_position(&scene), Vec3::new(0.0, 4.0, 0.0));
}

#[test]
fn test_add_and_remove_component_commands() {
    let mut scene = Scene::default();
    let entity = shape::create_empty_entity(&mut scene).unwrap();
    let mut stack = CommandStack::new();

    let state = ComponentState::Physics(PhysicsState {
        collider_type: ColliderType::Sphere,
        mass: 2.0,
    });
    let add = Command::add_component(&scene, entity, state).unwrap();
    assert!(stack.execute(&mut scene, add));
    assert_eq!(scene.physics().body_count(), 1);
    assert!(Command::add_component(
        &scene,
        entity,
        ComponentState::Physics(PhysicsState {
            collider_type: ColliderType::Box,
            mass: 1.0,
        })
    )
    .is_err());

    let remove = Command::remove_component(&scene, entity, ComponentKind::Physics).unwrap();
    assert!(stack.execute(&mut scene, remove));
    assert!(!scene.has::<PhysicsComponent>(entity));
    assert_eq!(scene.physics().body_count(), 0);

    // Undo the removal restores the same collider settings
    assert!(stack.undo(&mut scene));
    let physics = scene.get::<PhysicsComponent>(entity).unwrap();
    assert_eq!(physics.collider_type(), ColliderType::Sphere);
    assert_eq!(physics.mass(), 2.0);

    // Undo the add leaves the entity without a body
    assert!(stack.undo(&mut scene));
    assert!(!scene.has::<PhysicsComponent>(entity));
    assert_eq!(scene.physics().body_count(), 0);
}

#[test]
fn test_commands_on_destroyed_entity_are_noops() {
    let mut scene = Scene::default();
    let light = shape::create_point_light_entity(&mut scene).unwrap();
    let mut stack = CommandStack::new();

    let mut red = scene.get::<LightComponent>(light).unwrap().clone();
    red.color = Vec3::X;
    let command = Command::change_component_state(&scene, light, ComponentState::Light(red)).unwrap();
    stack.execute(&mut scene, command);

    scene.destroy_entity(light).unwrap();
    let replacement = shape::create_point_light_entity(&mut scene).unwrap();

    // Undo still pops the history but touches nothing
    assert!(stack.undo(&mut scene));
    assert!(stack.redo(&mut scene));
    assert_ne!(scene.get::<LightComponent>(replacement).unwrap().color, Vec3::X);
}

#[test]
fn test_rename_history() {
    let mut scene = Scene::default();
    let entity = shape::create_empty_entity(&mut scene).unwrap();
    let mut stack = CommandStack::new();

    for name in ["Player", "Hero"] {
        let command =
            Command::change_component_state(&scene, entity, ComponentState::Name(NameComponent::new(name)))
                .unwrap();
        stack.execute(&mut scene, command);
    }
    assert_eq!(stack.undo_len(), 2);

    stack.undo(&mut scene);
    stack.undo(&mut scene);
    assert_eq!(scene.get::<NameComponent>(entity).unwrap().as_str(), "Entity");
    assert_eq!(stack.redo_len(), 2);
}

#[test]
fn test_undoing_every_edit_restores_model_hierarchy() {
    let mut scene = Scene::default();
    let part = SubMesh {
        bounds: Aabb::unit(),
        textures: Vec::new(),
    };
    let model = ModelData {
        path: "models/robot.obj".into(),
        meshes: vec![part.clone(), part.clone(), part],
    };
    let entities = shape::create_model_entity(&mut scene, &model).unwrap();
    let root = entities[0];
    scene.set_position(entities[1], Vec3::new(1.0, 2.0, 3.0), false).unwrap();
    scene.set_position(entities[2], Vec3::new(-2.0, 0.5, 1.0), false).unwrap();
    scene.set_rotation(entities[3], Vec3::new(0.0, 90.0, 0.0), false).unwrap();
    let initial = transforms(&scene, &entities);

    let edits = [
        TransformComponent::new(Vec3::new(1.0, 2.0, 0.0), Vec3::ZERO, Vec3::ONE),
        TransformComponent::new(Vec3::new(1.0, 2.0, 0.0), Vec3::new(30.0, 45.0, 60.0), Vec3::ONE),
        TransformComponent::new(Vec3::new(1.0, 2.0, 0.0), Vec3::new(30.0, 45.0, 60.0), Vec3::new(2.0, 0.0, 1.0)),
        TransformComponent::new(Vec3::new(-3.0, 0.0, 4.0), Vec3::new(10.0, 0.0, -20.0), Vec3::splat(0.5)),
    ];
    let mut stack = CommandStack::new();
    for target in edits {
        let command = Command::change_component_state(&scene, root, ComponentState::Transform(target.into())).unwrap();
        assert!(stack.execute(&mut scene, command));
    }
    let edited = transforms(&scene, &entities);
    assert_ne!(edited, initial);

    while stack.undo(&mut scene) {}
    assert_eq!(transforms(&scene, &entities), initial);

    while stack.redo(&mut scene) {}
    assert_eq!(transforms(&scene, &entities), edited);
}

#[test]
fn test_undo_script_removal_rebinds_behavior() {
    let mut scene = Scene::default();
    scene
        .script_registry_mut()
        .add(ScriptDllDescriptor::new("spin.dll", "CreateSpin", "Spin"));
    scene.set_behavior_loader(Rc::new(
        FactoryBehaviorLoader::new().with_factory("CreateSpin", || Box::new(Spin)),
    ));
    let entity = shape::create_empty_entity(&mut scene).unwrap();
    let behavior = scene.bind_script("Spin");
    scene.add(entity, ScriptComponent::new("Spin", behavior)).unwrap();
    let mut stack = CommandStack::new();

    let remove = Command::remove_component(&scene, entity, ComponentKind::Script).unwrap();
    assert!(stack.execute(&mut scene, remove));
    assert!(!scene.has::<ScriptComponent>(entity));

    assert!(stack.undo(&mut scene));
    let script = scene.get::<ScriptComponent>(entity).unwrap();
    assert_eq!(script.behavior_name, "Spin");
    assert_eq!(script.behavior.name(), "Spin");
}

#[test]
fn test_audio_component_commands() {
    let mut scene = Scene::default();
    let entity = shape::create_empty_entity(&mut scene).unwrap();
    let mut stack = CommandStack::new();

    let add = Command::add_component(&scene, entity, ComponentState::Audio(AudioComponent::new("wind.ogg"))).unwrap();
    assert!(stack.execute(&mut scene, add));

    let louder = AudioComponent::new("wind.ogg").with_volume(2.0).with_looping(true);
    let change = Command::change_component_state(&scene, entity, ComponentState::Audio(louder.clone())).unwrap();
    assert!(stack.execute(&mut scene, change));
    assert_eq!(scene.get::<AudioComponent>(entity).unwrap(), &louder);

    assert!(stack.undo(&mut scene));
    assert_eq!(scene.get::<AudioComponent>(entity).unwrap().volume, 1.0);
    assert!(stack.undo(&mut scene));
    assert!(!scene.has::<AudioComponent>(entity));
}
