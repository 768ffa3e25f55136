//! Scene serialization and loading
//!
//! A scene file holds the scene name, the script library descriptors and one
//! block per named entity. Loading rebuilds each entity through its shape
//! factory and then layers the persisted component values on top.

use super::components::*;
use super::entity_mapper::EntityMapper;
use super::model::ModelLoader;
use crate::core::entity::{
    CreationTypeComponent, EcsError, Entity, EntityCreationType, NameComponent,
    TransformComponent, TransformEdit,
};
use crate::core::audio::AudioComponent;
use crate::core::camera::CameraComponent;
use crate::core::light::LightComponent;
use crate::graphics::{Aabb, MeshComponent, MeshRendererComponent};
use crate::physics::{ColliderType, PhysicsComponent};
use crate::scene::{shape, Scene};
use crate::scripting::{bind_behavior, BehaviorLoader, ScriptComponent, ScriptDllDescriptor};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const SCENE_KEY: &str = "Scene";
pub const SCRIPTS_KEY: &str = "ScriptsDLL";
pub const ENTITIES_KEY: &str = "Entities";

/// Errors that can occur during scene operations
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error(transparent)]
    Ecs(#[from] EcsError),

    #[error("failed to load model: {0}")]
    Model(String),
}

impl SceneError {
    fn invalid(field: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        SceneError::InvalidField {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

/// In-memory form of a scene file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(rename = "Scene")]
    pub scene: String,
    #[serde(rename = "ScriptsDLL", default)]
    pub scripts_dll: Vec<ScriptDllDescriptor>,
    /// One block per entity keyed by component name
    #[serde(rename = "Entities")]
    pub entities: Vec<Map<String, Value>>,
}

impl SceneDocument {
    /// Parse a document, requiring `Scene` and `Entities`
    ///
    /// Unknown top-level keys are ignored and null script descriptors skipped.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let mut value: Value = serde_json::from_str(json)?;
        let root = value
            .as_object_mut()
            .ok_or_else(|| SceneError::invalid("<root>", "expected an object"))?;
        for key in [SCENE_KEY, ENTITIES_KEY] {
            if !root.contains_key(key) {
                return Err(SceneError::MissingField(key));
            }
        }
        if let Some(Value::Array(scripts)) = root.get_mut(SCRIPTS_KEY) {
            scripts.retain(|entry| !entry.is_null());
        }
        if root.get(SCRIPTS_KEY).is_some_and(Value::is_null) {
            root.remove(SCRIPTS_KEY);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read a typed block from an entity, `None` if the key is absent
fn block<T: DeserializeOwned>(entity: &Map<String, Value>, key: &str) -> Result<Option<T>, SceneError> {
    entity
        .get(key)
        .map(|value| T::deserialize(value).map_err(|e| SceneError::invalid(key, e)))
        .transpose()
}

fn insert_block<T: Serialize>(target: &mut Map<String, Value>, key: &str, data: T) -> Result<(), SceneError> {
    target.insert(key.to_string(), serde_json::to_value(data)?);
    Ok(())
}

const KNOWN_KEYS: [&str; 11] = [
    ENTITY_ID_KEY,
    CREATION_TYPE_KEY,
    NAME_KEY,
    TRANSFORM_KEY,
    MESH_KEY,
    MESH_RENDERER_KEY,
    CAMERA_KEY,
    LIGHT_KEY,
    PHYSICS_KEY,
    SCRIPT_KEY,
    AUDIO_KEY,
];

/// Converts scenes to and from [`SceneDocument`]s
///
/// Loading needs collaborators to rebind behaviours and to rebuild models;
/// saving does not.
pub struct SceneSerializer<'a> {
    behaviors: &'a dyn BehaviorLoader,
    models: &'a dyn ModelLoader,
}

impl<'a> SceneSerializer<'a> {
    pub fn new(behaviors: &'a dyn BehaviorLoader, models: &'a dyn ModelLoader) -> Self {
        Self { behaviors, models }
    }

    /// Capture every named entity of the scene
    pub fn serialize(scene: &Scene) -> Result<SceneDocument, SceneError> {
        let scripts_dll = scene
            .script_registry()
            .iter()
            .filter(|descriptor| {
                let valid = descriptor.is_valid();
                if !valid {
                    warn!(descriptor = ?descriptor, "Skipping incomplete script descriptor");
                }
                valid
            })
            .cloned()
            .collect();

        let entities = scene
            .named_entities()
            .into_iter()
            .map(|entity| Self::serialize_entity(scene, entity))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(entities = entities.len(), "Serialized scene");
        Ok(SceneDocument {
            scene: scene.name().to_string(),
            scripts_dll,
            entities,
        })
    }

    fn serialize_entity(scene: &Scene, entity: Entity) -> Result<Map<String, Value>, SceneError> {
        let mut out = Map::new();
        out.insert(ENTITY_ID_KEY.to_string(), Value::from(entity.id()));

        if let Ok(creation) = scene.get::<CreationTypeComponent>(entity) {
            insert_block(&mut out, CREATION_TYPE_KEY, CreationTypeData { kind: creation.0.as_i32() })?;
        }
        if let Ok(name) = scene.get::<NameComponent>(entity) {
            insert_block(&mut out, NAME_KEY, NameData { name: name.0.clone() })?;
        }
        if let Ok(transform) = scene.get::<TransformComponent>(entity) {
            insert_block(&mut out, TRANSFORM_KEY, TransformData::from(transform))?;
        }
        if let Ok(mesh) = scene.get::<MeshComponent>(entity) {
            insert_block(&mut out, MESH_KEY, MeshData::from(mesh))?;
        }
        if let Ok(renderer) = scene.get::<MeshRendererComponent>(entity) {
            insert_block(&mut out, MESH_RENDERER_KEY, MeshRendererData::from(renderer))?;
        }
        if let Ok(camera) = scene.get::<CameraComponent>(entity) {
            insert_block(&mut out, CAMERA_KEY, CameraData::from(camera))?;
        }
        if let Ok(light) = scene.get::<LightComponent>(entity) {
            insert_block(&mut out, LIGHT_KEY, LightData::from(light))?;
        }
        if let Ok(physics) = scene.get::<PhysicsComponent>(entity) {
            let transform = scene.get::<TransformComponent>(entity).ok();
            let (position, rotation) = physics.world_transform(scene.physics()).unwrap_or_else(|| {
                transform
                    .map(|t| (t.position(), t.orientation()))
                    .unwrap_or_default()
            });
            let data = PhysicsData {
                kind: physics.collider_type().as_i32(),
                mass: physics.mass(),
                position,
                rotation,
                size: physics.shape_dimensions(),
            };
            insert_block(&mut out, PHYSICS_KEY, data)?;
        }
        if let Ok(script) = scene.get::<ScriptComponent>(entity) {
            let data = ScriptData {
                behavior_class_name: script.behavior_name.clone(),
            };
            insert_block(&mut out, SCRIPT_KEY, data)?;
        }
        if let Ok(audio) = scene.get::<AudioComponent>(entity) {
            insert_block(&mut out, AUDIO_KEY, AudioData::from(audio))?;
        }
        Ok(out)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_string(scene: &Scene) -> Result<String, SceneError> {
        Self::serialize(scene)?.to_json()
    }

    /// Save the scene; its name becomes the file stem
    ///
    /// # Arguments
    /// * `scene` - Scene to save, renamed after the file
    /// * `path` - Destination; missing parent directories are created
    pub fn save(scene: &mut Scene, path: &Path) -> Result<(), SceneError> {
        info!(path = ?path, "Saving scene to file");
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            scene.set_name(stem);
        }
        let json = Self::to_string(scene)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json)?;
        info!(path = ?path, "Scene saved successfully");
        Ok(())
    }

    /// Load a scene file into `scene`
    ///
    /// On any error the live scene is left unmodified.
    ///
    /// # Arguments
    /// * `scene` - Scene whose contents are replaced
    /// * `path` - Path to the scene JSON file
    ///
    /// # Returns
    /// Mapping from the file's entity IDs to the loaded entities
    pub fn load(&self, scene: &mut Scene, path: &Path) -> Result<EntityMapper, SceneError> {
        info!(path = ?path, "Loading scene from file");
        let json = fs::read_to_string(path)?;
        let document = SceneDocument::from_json(&json)?;
        let mapper = self.deserialize(scene, &document)?;
        info!(path = ?path, entities = mapper.len(), "Scene loaded successfully");
        Ok(mapper)
    }

    /// Replace the contents of `scene` with the document
    ///
    /// The document is built into a fresh scene that is swapped in only when
    /// every entity loaded, so a malformed document cannot corrupt `scene`.
    pub fn deserialize(&self, scene: &mut Scene, document: &SceneDocument) -> Result<EntityMapper, SceneError> {
        let mut staging = Scene::new(scene.config().clone());
        staging.set_name(document.scene.clone());
        if let Some(loader) = scene.behavior_loader() {
            staging.set_behavior_loader(loader);
        }

        // Descriptors must be registered before any script is bound
        for descriptor in &document.scripts_dll {
            staging.script_registry_mut().add(descriptor.clone());
        }

        let mut mapper = EntityMapper::new();
        for (index, entity_data) in document.entities.iter().enumerate() {
            let entity = self.deserialize_entity(&mut staging, entity_data).map_err(|err| {
                error!(index, error = %err, "Failed to deserialize entity");
                err
            })?;
            let old_id = entity_data
                .get(ENTITY_ID_KEY)
                .and_then(Value::as_i64)
                .unwrap_or(index as i64);
            mapper.register(old_id, entity);
        }

        std::mem::swap(scene, &mut staging);
        info!(scene = %scene.name(), entities = mapper.len(), "Deserialized scene");
        Ok(mapper)
    }

    fn deserialize_entity(&self, scene: &mut Scene, data: &Map<String, Value>) -> Result<Entity, SceneError> {
        for key in data.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            warn!(component_type = %key, "Unknown component type in scene, skipping");
        }

        let kind = match block::<CreationTypeData>(data, CREATION_TYPE_KEY)? {
            Some(creation) => EntityCreationType::from_i32(creation.kind).ok_or_else(|| {
                SceneError::invalid(CREATION_TYPE_KEY, format!("unknown type {}", creation.kind))
            })?,
            None => EntityCreationType::Entity,
        };
        let mesh_data = block::<MeshData>(data, MESH_KEY)?;
        let textures = mesh_data
            .as_ref()
            .map(MeshData::texture_specifications)
            .unwrap_or_default();

        let entity = match kind {
            EntityCreationType::Entity => shape::create_empty_entity(scene)?,
            EntityCreationType::Cube => shape::create_cube_entity(scene, textures)?,
            EntityCreationType::Plate => shape::create_plate_entity(scene, textures)?,
            EntityCreationType::Cubemap => shape::create_cubemap_entity(scene, textures)?,
            EntityCreationType::PointLight => shape::create_point_light_entity(scene)?,
            EntityCreationType::SpotLight => shape::create_spot_light_entity(scene)?,
            EntityCreationType::DirLight => shape::create_dir_light_entity(scene)?,
            EntityCreationType::Camera => shape::create_camera_entity(scene)?,
            EntityCreationType::Model => {
                let path = mesh_data
                    .as_ref()
                    .map(|mesh| mesh.model_path.as_str())
                    .unwrap_or_default();
                let model = self.models.load(path).map_err(SceneError::Model)?;
                shape::create_model_entity(scene, &model)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| SceneError::Model(format!("model '{path}' produced no entities")))?
            }
        };

        if let Some(name) = block::<NameData>(data, NAME_KEY)? {
            scene.insert(entity, NameComponent::new(name.name))?;
        }

        if let Some(transform) = block::<TransformData>(data, TRANSFORM_KEY)? {
            if !scene.has::<TransformComponent>(entity) {
                scene.add(entity, TransformComponent::default())?;
            }
            // Propagated so model parts follow their root
            scene.edit_transform(entity, TransformEdit::SetSize(transform.size), true)?;
            scene.edit_transform(entity, TransformEdit::SetRotation(transform.rotation), true)?;
            scene.edit_transform(entity, TransformEdit::SetPosition(transform.position), true)?;
        }

        if let Some(mesh) = mesh_data {
            match scene.get_mut::<MeshComponent>(entity) {
                Ok(existing) => {
                    existing.model_path = mesh.model_path.clone();
                    existing.textures = mesh.texture_specifications();
                }
                Err(_) => {
                    let textures = mesh.texture_specifications();
                    let mut component = MeshComponent::new(mesh.model_path.clone(), Aabb::unit());
                    component.model_path = mesh.model_path;
                    scene.add(entity, component.with_textures(textures))?;
                }
            }
        }

        if let Some(renderer) = block::<MeshRendererData>(data, MESH_RENDERER_KEY)? {
            let shader = scene
                .shader_cache_mut()
                .get_or_create(&renderer.shaders.vert_path, &renderer.shaders.frag_path);
            match scene.get_mut::<MeshRendererComponent>(entity) {
                Ok(existing) => {
                    existing.material = renderer.material.into();
                    existing.shader = shader;
                }
                Err(_) => {
                    let registry_id = scene
                        .get::<MeshComponent>(entity)
                        .map(|mesh| mesh.registry_id.clone())
                        .unwrap_or_default();
                    let mut component = MeshRendererComponent::new(shader, entity.id(), registry_id);
                    component.material = renderer.material.into();
                    scene.add(entity, component)?;
                }
            }
        }

        if let Some(camera) = block::<CameraData>(data, CAMERA_KEY)? {
            let component = camera
                .to_component()
                .ok_or_else(|| SceneError::invalid(CAMERA_KEY, format!("unknown projection {}", camera.kind)))?;
            scene.insert(entity, component)?;
        }

        if let Some(light) = block::<LightData>(data, LIGHT_KEY)? {
            let component = light
                .to_component()
                .ok_or_else(|| SceneError::invalid(LIGHT_KEY, format!("unknown light type {}", light.kind)))?;
            scene.insert(entity, component)?;
        }

        if let Some(script) = block::<ScriptData>(data, SCRIPT_KEY)? {
            let behavior = bind_behavior(scene.script_registry(), self.behaviors, &script.behavior_class_name);
            scene.insert(entity, ScriptComponent::new(script.behavior_class_name, behavior))?;
        }

        if let Some(audio) = block::<AudioData>(data, AUDIO_KEY)? {
            scene.insert(entity, AudioComponent::from(audio))?;
        }

        // Last, so the collider is fitted to the final transform size
        if let Some(physics) = block::<PhysicsData>(data, PHYSICS_KEY)? {
            let collider_type = ColliderType::from_i32(physics.kind).ok_or_else(|| {
                SceneError::invalid(PHYSICS_KEY, format!("unknown collider type {}", physics.kind))
            })?;
            scene.remove::<PhysicsComponent>(entity);
            let component = scene.add_physics(entity, collider_type, physics.mass)?.clone();
            component.set_world_transform(scene.physics_mut(), physics.position, physics.rotation);
        }

        debug!(entity = %entity, kind = ?kind, "Deserialized entity");
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::model::UnitCubeModelLoader;
    use crate::scripting::FactoryBehaviorLoader;
    use glam::Vec3;
    use serde_json::json;

    fn round_trip(scene: &Scene) -> Scene {
        let document = SceneSerializer::serialize(scene).unwrap();
        let json = document.to_json().unwrap();
        let parsed = SceneDocument::from_json(&json).unwrap();

        let behaviors = FactoryBehaviorLoader::new();
        let serializer = SceneSerializer::new(&behaviors, &UnitCubeModelLoader);
        let mut loaded = Scene::default();
        serializer.deserialize(&mut loaded, &parsed).unwrap();
        loaded
    }

    #[test]
    fn test_required_fields() {
        assert!(matches!(
            SceneDocument::from_json(r#"{ "Entities": [] }"#),
            Err(SceneError::MissingField("Scene"))
        ));
        assert!(matches!(
            SceneDocument::from_json(r#"{ "Scene": "x" }"#),
            Err(SceneError::MissingField("Entities"))
        ));
        let document = SceneDocument::from_json(
            r#"{ "Scene": "x", "Entities": [], "Extra": 1, "ScriptsDLL": [null] }"#,
        )
        .unwrap();
        assert_eq!(document.scene, "x");
        assert!(document.scripts_dll.is_empty());
    }

    #[test]
    fn test_document_layout() {
        let mut scene = Scene::default();
        scene.set_name("Level");
        shape::create_cube_entity(&mut scene, Vec::new()).unwrap();
        let value = serde_json::to_value(SceneSerializer::serialize(&scene).unwrap()).unwrap();

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["Scene", "ScriptsDLL", "Entities"]);
        let cube = &value["Entities"][0];
        assert_eq!(cube["CreationTypeComponent"]["Type"], json!(1));
        assert_eq!(cube["NameComponent"]["Name"], json!("Cube"));
        assert_eq!(cube["TransformComponent"]["Size"], json!([1.0, 1.0, 1.0]));
        assert_eq!(cube["MeshRendererComponent"]["Shaders"]["VertPath"], json!("shaders/default.vert"));
        assert_eq!(cube["PhysicsComponent"]["Mass"], json!(0.0));
        assert!(cube.get("CameraComponent").is_none());
    }

    #[test]
    fn test_cube_round_trip_keeps_defaults() {
        let mut scene = Scene::default();
        shape::create_cube_entity(&mut scene, Vec::new()).unwrap();
        let loaded = round_trip(&scene);

        let cube = loaded.named_entities()[0];
        assert_eq!(loaded.get::<TransformComponent>(cube).unwrap().size(), Vec3::ONE);
        assert_eq!(
            loaded.get::<MeshRendererComponent>(cube).unwrap().material,
            crate::graphics::Material::default()
        );
    }

    #[test]
    fn test_physics_size_is_shape_dimensions() {
        let mut scene = Scene::default();
        let plate = shape::create_plate_entity(&mut scene, Vec::new()).unwrap();
        scene.set_size(plate, Vec3::new(4.0, 1.0, 4.0), true).unwrap();
        let dimensions = scene.get::<PhysicsComponent>(plate).unwrap().shape_dimensions();
        assert_ne!(dimensions, Vec3::new(4.0, 1.0, 4.0));

        let document = SceneSerializer::serialize(&scene).unwrap();
        let physics: PhysicsData = block(&document.entities[0], PHYSICS_KEY).unwrap().unwrap();
        assert_eq!(physics.size, dimensions);
    }

    #[test]
    fn test_audio_round_trip() {
        let mut scene = Scene::default();
        let speaker = shape::create_empty_entity(&mut scene).unwrap();
        let audio = AudioComponent::new("music/theme.ogg").with_volume(0.5).with_looping(true);
        scene.add(speaker, audio.clone()).unwrap();

        let loaded = round_trip(&scene);
        let speaker = loaded.named_entities()[0];
        assert_eq!(loaded.get::<AudioComponent>(speaker).unwrap(), &audio);
    }

    #[test]
    fn test_load_keeps_behavior_loader() {
        let mut scene = Scene::default();
        scene.set_behavior_loader(std::rc::Rc::new(FactoryBehaviorLoader::new()));
        let behaviors = FactoryBehaviorLoader::new();
        let serializer = SceneSerializer::new(&behaviors, &UnitCubeModelLoader);
        let document = SceneDocument::from_json(r#"{ "Scene": "s", "Entities": [] }"#).unwrap();

        serializer.deserialize(&mut scene, &document).unwrap();
        assert!(scene.behavior_loader().is_some());
    }

    #[test]
    fn test_scaffolding_is_not_serialized() {
        let mut scene = Scene::default();
        let bare = scene.create_entity();
        scene.add(bare, TransformComponent::default()).unwrap();
        shape::create_camera_entity(&mut scene).unwrap();

        let document = SceneSerializer::serialize(&scene).unwrap();
        assert_eq!(document.entities.len(), 1);
    }

    #[test]
    fn test_bad_block_leaves_scene_untouched() {
        let mut scene = Scene::default();
        let existing = shape::create_cube_entity(&mut scene, Vec::new()).unwrap();
        let document = SceneDocument::from_json(
            r#"{ "Scene": "bad", "Entities": [ { "LightComponent": { "Type": "nope" } } ] }"#,
        )
        .unwrap();

        let behaviors = FactoryBehaviorLoader::new();
        let serializer = SceneSerializer::new(&behaviors, &UnitCubeModelLoader);
        let result = serializer.deserialize(&mut scene, &document);
        assert!(matches!(result, Err(SceneError::InvalidField { .. })));
        assert!(scene.contains(existing));
        assert_ne!(scene.name(), "bad");
    }

    #[test]
    fn test_unresolved_script_binds_noop() {
        let document = SceneDocument::from_json(
            r#"{
                "Scene": "s",
                "Entities": [ { "NameComponent": { "Name": "Runner" },
                                "ScriptComponent": { "BehaviorClassName": "Missing" } } ]
            }"#,
        )
        .unwrap();
        let behaviors = FactoryBehaviorLoader::new();
        let serializer = SceneSerializer::new(&behaviors, &UnitCubeModelLoader);
        let mut scene = Scene::default();
        serializer.deserialize(&mut scene, &document).unwrap();

        let runner = scene.named_entities()[0];
        let script = scene.get::<ScriptComponent>(runner).unwrap();
        assert_eq!(script.behavior_name, "Missing");
        assert_eq!(script.behavior.name(), "NoopBehavior");
    }
}
