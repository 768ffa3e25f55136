//! Built-in entity factories
//!
//! Each factory creates an entity with the baseline component set for its
//! [`EntityCreationType`]. Loading a scene runs the matching factory first and
//! then overwrites the defaults with persisted values.

use super::Scene;
use crate::core::camera::CameraComponent;
use crate::core::entity::{
    CreationTypeComponent, EcsError, Entity, EntityCreationType, NameComponent, Parent,
    TransformComponent,
};
use crate::core::light::{LightComponent, LightType};
use crate::graphics::{Aabb, MeshComponent, MeshRendererComponent, TextureSpecification};
use crate::io::model::ModelData;
use crate::physics::ColliderType;
use crate::shaders;
use glam::Vec3;
use tracing::debug;

/// Mesh registry ids of the built-in shapes
pub const CUBE_MESH: &str = "Cube";
pub const PLATE_MESH: &str = "Plate";
pub const CUBEMAP_MESH: &str = "Cubemap";
pub const LIGHT_MESH: &str = "LightCube";

/// Half thickness of a plate along Y
const PLATE_HALF_THICKNESS: f32 = 0.005;

fn spawn_named(scene: &mut Scene, kind: EntityCreationType) -> Result<Entity, EcsError> {
    let entity = scene.create_entity();
    scene.add(entity, NameComponent::new(kind.default_name()))?;
    scene.add(entity, CreationTypeComponent(kind))?;
    scene.add(entity, TransformComponent::default())?;
    Ok(entity)
}

fn attach_mesh(
    scene: &mut Scene,
    entity: Entity,
    mesh: MeshComponent,
    vertex_shader: &str,
    fragment_shader: &str,
) -> Result<(), EcsError> {
    let shader = scene
        .shader_cache_mut()
        .get_or_create(vertex_shader, fragment_shader);
    let renderer = MeshRendererComponent::new(shader, entity.id(), mesh.registry_id.clone());
    scene.add(entity, mesh)?;
    scene.add(entity, renderer)?;
    Ok(())
}

/// Named entity with only a transform
pub fn create_empty_entity(scene: &mut Scene) -> Result<Entity, EcsError> {
    spawn_named(scene, EntityCreationType::Entity)
}

/// Unit cube with a static box collider
pub fn create_cube_entity(
    scene: &mut Scene,
    textures: Vec<TextureSpecification>,
) -> Result<Entity, EcsError> {
    let entity = spawn_named(scene, EntityCreationType::Cube)?;
    attach_mesh(
        scene,
        entity,
        MeshComponent::new(CUBE_MESH, Aabb::unit()).with_textures(textures),
        shaders::DEFAULT_VERTEX_SHADER,
        shaders::DEFAULT_FRAGMENT_SHADER,
    )?;
    scene.add_physics(entity, ColliderType::Box, 0.0)?;
    debug!(entity = %entity, "Created cube");
    Ok(entity)
}

/// Thin unit plate in the XZ plane with a static box collider
pub fn create_plate_entity(
    scene: &mut Scene,
    textures: Vec<TextureSpecification>,
) -> Result<Entity, EcsError> {
    let entity = spawn_named(scene, EntityCreationType::Plate)?;
    let bounds = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(0.5, PLATE_HALF_THICKNESS, 0.5));
    attach_mesh(
        scene,
        entity,
        MeshComponent::new(PLATE_MESH, bounds).with_textures(textures),
        shaders::DEFAULT_VERTEX_SHADER,
        shaders::DEFAULT_FRAGMENT_SHADER,
    )?;
    scene.add_physics(entity, ColliderType::Box, 0.0)?;
    debug!(entity = %entity, "Created plate");
    Ok(entity)
}

/// Sky box; `textures` holds the six cube faces
pub fn create_cubemap_entity(
    scene: &mut Scene,
    textures: Vec<TextureSpecification>,
) -> Result<Entity, EcsError> {
    let entity = spawn_named(scene, EntityCreationType::Cubemap)?;
    attach_mesh(
        scene,
        entity,
        MeshComponent::new(CUBEMAP_MESH, Aabb::unit()).with_textures(textures),
        shaders::CUBEMAP_VERTEX_SHADER,
        shaders::CUBEMAP_FRAGMENT_SHADER,
    )?;
    debug!(entity = %entity, "Created cubemap");
    Ok(entity)
}

fn create_light_entity(
    scene: &mut Scene,
    kind: EntityCreationType,
    light_type: LightType,
) -> Result<Entity, EcsError> {
    let entity = spawn_named(scene, kind)?;
    attach_mesh(
        scene,
        entity,
        MeshComponent::new(LIGHT_MESH, Aabb::unit()),
        shaders::LIGHT_VERTEX_SHADER,
        shaders::LIGHT_FRAGMENT_SHADER,
    )?;
    let light = LightComponent::new(light_type);
    scene.get_mut::<MeshRendererComponent>(entity)?.material.obj_color = light.color;
    scene.add(entity, light)?;
    debug!(entity = %entity, light = light_type.label(), "Created light");
    Ok(entity)
}

pub fn create_point_light_entity(scene: &mut Scene) -> Result<Entity, EcsError> {
    create_light_entity(scene, EntityCreationType::PointLight, LightType::Point)
}

pub fn create_spot_light_entity(scene: &mut Scene) -> Result<Entity, EcsError> {
    create_light_entity(scene, EntityCreationType::SpotLight, LightType::Spot)
}

pub fn create_dir_light_entity(scene: &mut Scene) -> Result<Entity, EcsError> {
    create_light_entity(scene, EntityCreationType::DirLight, LightType::Dir)
}

/// Scene camera with a perspective projection
pub fn create_camera_entity(scene: &mut Scene) -> Result<Entity, EcsError> {
    let entity = spawn_named(scene, EntityCreationType::Camera)?;
    scene.add(entity, CameraComponent::default())?;
    debug!(entity = %entity, "Created camera");
    Ok(entity)
}

/// Imported model: a named root plus one unnamed entity per sub-mesh
///
/// The root comes first in the returned list. Sub-mesh entities are parented
/// to the root so transform edits and destruction reach them.
pub fn create_model_entity(scene: &mut Scene, model: &ModelData) -> Result<Vec<Entity>, EcsError> {
    let root = spawn_named(scene, EntityCreationType::Model)?;
    let mut root_mesh = MeshComponent::new(model.path.clone(), model.bounds());
    root_mesh.model_path = model.path.clone();
    scene.add(root, root_mesh)?;

    let mut entities = vec![root];
    for (index, sub_mesh) in model.meshes.iter().enumerate() {
        let part = scene.create_entity();
        scene.add(part, TransformComponent::default())?;
        scene.add(part, Parent(root))?;
        attach_mesh(
            scene,
            part,
            MeshComponent::new(format!("{}#{index}", model.path), sub_mesh.bounds)
                .with_textures(sub_mesh.textures.clone()),
            shaders::DEFAULT_VERTEX_SHADER,
            shaders::DEFAULT_FRAGMENT_SHADER,
        )?;
        entities.push(part);
    }
    debug!(root = %root, parts = model.meshes.len(), path = %model.path, "Created model");
    Ok(entities)
}
