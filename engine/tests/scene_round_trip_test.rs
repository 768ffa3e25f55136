//! Integration tests for saving and reloading scenes with scripts

use engine::core::entity::{NameComponent, TransformComponent};
use engine::graphics::MeshRendererComponent;
use engine::io::{SceneDocument, SceneSerializer, UnitCubeModelLoader};
use engine::scene::{shape, Scene, SceneState};
use engine::scripting::{
    Behavior, BehaviorContext, FactoryBehaviorLoader, ScriptComponent, ScriptDllDescriptor,
};
use glam::Vec3;
use tempfile::TempDir;

struct Spin;

impl Behavior for Spin {
    fn update(&mut self, ctx: &mut BehaviorContext<'_>) {
        if let Ok(transform) = ctx.store.get_mut::<TransformComponent>(ctx.entity) {
            transform.rotate(Vec3::new(0.0, 90.0 * ctx.delta_time, 0.0));
        }
    }

    fn name(&self) -> &str {
        "Spin"
    }
}

fn loader() -> FactoryBehaviorLoader {
    FactoryBehaviorLoader::new().with_factory("CreateSpin", || Box::new(Spin) as Box<dyn Behavior>)
}

fn authored_scene() -> Scene {
    let mut scene = Scene::default();
    scene
        .script_registry_mut()
        .add(ScriptDllDescriptor::new("scripts/spin.so", "CreateSpin", "Spin"));
    let cube = shape::create_cube_entity(&mut scene, Vec::new()).unwrap();
    scene.insert(cube, NameComponent::new("Spinner")).unwrap();
    scene.insert(cube, ScriptComponent::unbound("Spin")).unwrap();
    scene.get_mut::<MeshRendererComponent>(cube).unwrap().material.shininess = 8.0;
    shape::create_dir_light_entity(&mut scene).unwrap();
    scene
}

#[test]
fn test_save_load_save_is_stable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Demo.json");
    let behaviors = loader();
    let serializer = SceneSerializer::new(&behaviors, &UnitCubeModelLoader);

    let mut scene = authored_scene();
    SceneSerializer::save(&mut scene, &path).unwrap();
    let first = std::fs::read_to_string(&path).unwrap();

    let mut loaded = Scene::default();
    serializer.load(&mut loaded, &path).unwrap();
    SceneSerializer::save(&mut loaded, &path).unwrap();
    let second = std::fs::read_to_string(&path).unwrap();

    let a = SceneDocument::from_json(&first).unwrap();
    let b = SceneDocument::from_json(&second).unwrap();
    assert_eq!(a.scene, b.scene);
    assert_eq!(a.scripts_dll, b.scripts_dll);
    assert_eq!(a.entities.len(), b.entities.len());
    for (left, right) in a.entities.iter().zip(&b.entities) {
        let mut left = left.clone();
        let mut right = right.clone();
        // Runtime IDs are allowed to differ between sessions
        left.remove("Entity ID");
        right.remove("Entity ID");
        assert_eq!(left, right);
    }
}

#[test]
fn test_loaded_script_runs_when_playing() {
    let behaviors = loader();
    let serializer = SceneSerializer::new(&behaviors, &UnitCubeModelLoader);
    let document = SceneSerializer::serialize(&authored_scene()).unwrap();

    let mut scene = Scene::default();
    serializer.deserialize(&mut scene, &document).unwrap();
    let spinner = scene
        .named_entities()
        .into_iter()
        .find(|&entity| scene.get::<NameComponent>(entity).unwrap().as_str() == "Spinner")
        .unwrap();
    assert_eq!(scene.get::<ScriptComponent>(spinner).unwrap().behavior.name(), "Spin");

    scene.update(1.0);
    assert_eq!(scene.get::<TransformComponent>(spinner).unwrap().rotation(), Vec3::ZERO);

    scene.set_state(SceneState::Run);
    scene.update(1.0);
    let rotation = scene.get::<TransformComponent>(spinner).unwrap().rotation();
    assert!((rotation.y - 90.0).abs() < 1e-3);
}

#[test]
fn test_loaded_material_is_kept() {
    let behaviors = loader();
    let serializer = SceneSerializer::new(&behaviors, &UnitCubeModelLoader);
    let document = SceneSerializer::serialize(&authored_scene()).unwrap();

    let mut scene = Scene::default();
    serializer.deserialize(&mut scene, &document).unwrap();
    let shininess: Vec<f32> = scene
        .store()
        .each::<MeshRendererComponent>()
        .map(|(_, renderer)| renderer.material.shininess)
        .collect();
    assert!(shininess.contains(&8.0));
}
