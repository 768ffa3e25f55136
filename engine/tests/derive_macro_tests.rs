//! Integration tests for the derive macro used from outside the engine crate

use engine::component_system::Component;
use engine::scene::Scene;

#[derive(Debug, Clone, PartialEq, Default, engine_derive::Component)]
#[component(name = "DerivedTestComponent")]
struct DerivedTestComponent {
    value: i32,
    text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, engine_derive::Component)]
struct Health(f32);

#[test]
fn test_derived_component_name() {
    assert_eq!(DerivedTestComponent::component_name(), "DerivedTestComponent");
    assert_eq!(Health::component_name(), "Health");
}

#[test]
fn test_user_components_live_in_scene() {
    let mut scene = Scene::default();
    let entity = scene.create_entity();

    scene
        .add(
            entity,
            DerivedTestComponent {
                value: 42,
                text: "Hello, World!".to_string(),
            },
        )
        .unwrap();
    scene.add(entity, Health(10.0)).unwrap();

    scene.get_mut::<Health>(entity).unwrap().0 -= 2.5;
    assert_eq!(scene.get::<Health>(entity).unwrap().0, 7.5);
    assert_eq!(scene.get::<DerivedTestComponent>(entity).unwrap().value, 42);

    // Duplicate adds are rejected with the component's name
    let err = scene.add(entity, Health(1.0)).unwrap_err();
    assert!(err.to_string().contains("Health"));
}

#[test]
fn test_user_components_are_not_persisted() {
    let mut scene = Scene::default();
    let entity = engine::scene::shape::create_empty_entity(&mut scene).unwrap();
    scene.add(entity, Health(3.0)).unwrap();

    let document = engine::io::SceneSerializer::serialize(&scene).unwrap();
    assert!(!document.entities[0].contains_key("Health"));
}
