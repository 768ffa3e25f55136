//! Integration tests for simulation across scene state changes

use engine::config::EngineConfig;
use engine::core::entity::TransformComponent;
use engine::physics::{ColliderType, PhysicsComponent};
use engine::scene::{shape, Scene, SceneState};
use glam::Vec3;

fn falling_cube(scene: &mut Scene) -> engine::core::entity::Entity {
    let cube = shape::create_cube_entity(scene, Vec::new()).unwrap();
    scene.set_position(cube, Vec3::new(0.0, 5.0, 0.0), true).unwrap();
    scene.remove::<PhysicsComponent>(cube);
    scene.add_physics(cube, ColliderType::Box, 1.0).unwrap();
    cube
}

fn height(scene: &Scene, entity: engine::core::entity::Entity) -> f32 {
    scene.get::<TransformComponent>(entity).unwrap().position().y
}

#[test]
fn test_bodies_only_move_while_running() {
    let _ = tracing_subscriber::fmt::try_init();
    let mut scene = Scene::default();
    let cube = falling_cube(&mut scene);

    scene.update(0.5);
    assert_eq!(height(&scene, cube), 5.0, "edit mode must not simulate");

    assert!(scene.set_state(SceneState::Run));
    scene.update(0.5);
    let after_run = height(&scene, cube);
    assert!(after_run < 5.0);

    assert!(scene.set_state(SceneState::Pause));
    scene.update(0.5);
    assert_eq!(height(&scene, cube), after_run, "paused scene must not simulate");

    assert!(scene.set_state(SceneState::Run));
    scene.update(0.1);
    assert!(height(&scene, cube) < after_run);
}

#[test]
fn test_static_plate_never_moves() {
    let mut scene = Scene::default();
    let plate = shape::create_plate_entity(&mut scene, Vec::new()).unwrap();
    scene.set_position(plate, Vec3::new(0.0, 2.0, 0.0), true).unwrap();

    scene.set_state(SceneState::Run);
    for _ in 0..30 {
        scene.update(1.0 / 60.0);
    }
    assert_eq!(height(&scene, plate), 2.0);
}

#[test]
fn test_stop_keeps_simulated_pose_and_focus() {
    let mut scene = Scene::default();
    let cube = falling_cube(&mut scene);

    scene.set_state(SceneState::Run);
    assert!(!scene.is_focused_on_debug_camera());
    scene.update(0.5);
    let simulated = height(&scene, cube);

    assert!(scene.set_state(SceneState::Edit));
    assert!(scene.is_focused_on_debug_camera());
    assert_eq!(height(&scene, cube), simulated);

    // Velocity was cleared, so a second run starts from rest
    scene.set_state(SceneState::Run);
    scene.update(1.0 / 60.0);
    let fallen = simulated - height(&scene, cube);
    assert!(fallen >= 0.0 && fallen < 0.05);
}

#[test]
fn test_stop_can_restore_pre_run_pose() {
    let mut config = EngineConfig::default();
    config.scene.restore_transforms_on_stop = true;
    let mut scene = Scene::new(config);
    let cube = falling_cube(&mut scene);

    scene.set_state(SceneState::Run);
    scene.update(0.5);
    assert!(height(&scene, cube) < 5.0);

    scene.set_state(SceneState::Edit);
    assert_eq!(height(&scene, cube), 5.0);
    let physics = scene.get::<PhysicsComponent>(cube).unwrap();
    assert_eq!(physics.world_transform(scene.physics()).unwrap().0.y, 5.0);
}

#[test]
fn test_edit_to_pause_is_rejected() {
    let mut scene = Scene::default();
    assert!(!scene.set_state(SceneState::Pause));
    assert_eq!(scene.state(), SceneState::Edit);
}
