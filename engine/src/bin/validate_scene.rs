//! CLI tool for validating scene files
//!
//! Usage: cargo run --bin validate_scene <scene.json>...

use engine::core::entity::{CreationTypeComponent, EntityCreationType, NameComponent};
use engine::io::{SceneSerializer, UnitCubeModelLoader};
use engine::physics::PhysicsComponent;
use engine::scene::Scene;
use engine::scripting::{FactoryBehaviorLoader, ScriptComponent};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("engine::io=warn")
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <scene.json>...", args[0]);
        eprintln!("\nLoads each scene headlessly and reports its contents.");
        process::exit(1);
    }

    let behaviors = FactoryBehaviorLoader::new();
    let serializer = SceneSerializer::new(&behaviors, &UnitCubeModelLoader);
    let mut all_valid = true;

    for scene_path in &args[1..] {
        println!("=== Scene Validation Report ===");
        println!("File: {}", scene_path);

        let mut scene = Scene::default();
        if let Err(e) = serializer.load(&mut scene, Path::new(scene_path)) {
            eprintln!("ERROR: Failed to load scene '{}': {}", scene_path, e);
            all_valid = false;
            continue;
        }
        report(&scene);
        println!();
    }

    if !all_valid {
        process::exit(1);
    }
}

fn report(scene: &Scene) {
    let named = scene.named_entities();
    println!("Scene: {}", scene.name());
    println!("Entities: {} ({} named)", scene.entity_count(), named.len());

    let mut by_type: BTreeMap<&'static str, usize> = BTreeMap::new();
    for &entity in &named {
        let kind = scene
            .get::<CreationTypeComponent>(entity)
            .map(|creation| creation.0)
            .unwrap_or(EntityCreationType::Entity);
        *by_type.entry(kind.default_name()).or_default() += 1;
    }
    for (kind, count) in &by_type {
        println!("  {}: {}", kind, count);
    }

    let dynamic = scene
        .store()
        .entities_with::<PhysicsComponent>()
        .into_iter()
        .filter(|&entity| scene.get::<PhysicsComponent>(entity).is_ok_and(|body| !body.is_static()))
        .count();
    println!("Physics bodies: {} ({} dynamic)", scene.physics().body_count(), dynamic);

    let unresolved: Vec<_> = scene
        .store()
        .entities_with::<ScriptComponent>()
        .into_iter()
        .filter_map(|entity| {
            let script = scene.get::<ScriptComponent>(entity).ok()?;
            if scene.script_registry().contains(&script.behavior_name) {
                return None;
            }
            let name = scene
                .get::<NameComponent>(entity)
                .map(|name| name.as_str().to_string())
                .unwrap_or_else(|_| entity.to_string());
            Some((name, script.behavior_name.clone()))
        })
        .collect();
    if !unresolved.is_empty() {
        println!("\nWARNINGS:");
        for (entity, behavior) in &unresolved {
            println!("  - {}: behaviour '{}' has no registered library", entity, behavior);
        }
    }
}
