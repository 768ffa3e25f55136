//! Scene operation handlers
//!
//! This module provides the actual implementation of scene operations
//! that are triggered from the editor UI. Component edits go through the
//! command stack so they can be undone; creation, destruction and file
//! operations do not.

use crate::editor_state::EditorState;
use crate::settings::{ProjectSettings, SettingsError};
use engine::core::entity::{EcsError, Entity, EntityCreationType, TransformComponent};
use engine::io::{EntityMapper, ModelLoader, SceneError, SceneSerializer};
use engine::scene::{shape, Scene, SceneState};
use engine::undo::{Command, ComponentKind, ComponentState, TransformState};
use glam::Vec3;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Ecs(#[from] EcsError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("failed to import model: {0}")]
    Model(String),

    #[error("the scene has never been saved; choose a file")]
    NoScenePath,

    #[error("operation not allowed while the scene is {0:?}")]
    NotEditing(SceneState),

    #[error("{0:?} entities are created by importing a model")]
    RequiresModel(EntityCreationType),
}

fn ensure_editing(scene: &Scene) -> Result<(), EditorError> {
    match scene.state() {
        SceneState::Edit => Ok(()),
        state => Err(EditorError::NotEditing(state)),
    }
}

/// Create an entity through its shape factory and select it
pub fn create_entity(
    editor: &mut EditorState,
    scene: &mut Scene,
    kind: EntityCreationType,
) -> Result<Entity, EditorError> {
    ensure_editing(scene)?;
    let entity = match kind {
        EntityCreationType::Entity => shape::create_empty_entity(scene)?,
        EntityCreationType::Cube => shape::create_cube_entity(scene, Vec::new())?,
        EntityCreationType::Plate => shape::create_plate_entity(scene, Vec::new())?,
        EntityCreationType::Cubemap => shape::create_cubemap_entity(scene, Vec::new())?,
        EntityCreationType::PointLight => shape::create_point_light_entity(scene)?,
        EntityCreationType::SpotLight => shape::create_spot_light_entity(scene)?,
        EntityCreationType::DirLight => shape::create_dir_light_entity(scene)?,
        EntityCreationType::Camera => shape::create_camera_entity(scene)?,
        EntityCreationType::Model => return Err(EditorError::RequiresModel(kind)),
    };
    info!(entity = %entity, kind = ?kind, "Created entity");
    editor.select_entity(scene, entity);
    editor.scene_modified = true;
    Ok(entity)
}

/// Import a model file and select its root
pub fn import_model(
    editor: &mut EditorState,
    scene: &mut Scene,
    models: &dyn ModelLoader,
    path: &str,
) -> Result<Entity, EditorError> {
    ensure_editing(scene)?;
    let model = models.load(path).map_err(EditorError::Model)?;
    let entities = shape::create_model_entity(scene, &model)?;
    let root = *entities
        .first()
        .ok_or_else(|| EditorError::Model(format!("model '{path}' has no meshes")))?;
    info!(root = %root, path = %path, "Imported model");
    editor.select_entity(scene, root);
    editor.scene_modified = true;
    Ok(root)
}

/// Destroy the selected entity; returns false if nothing was selected
pub fn destroy_selected(editor: &mut EditorState, scene: &mut Scene) -> Result<bool, EditorError> {
    ensure_editing(scene)?;
    let Some(entity) = editor.selected_entity(scene) else {
        return Ok(false);
    };
    editor.unselect_entity(scene);
    scene.destroy_entity(entity)?;
    info!(entity = %entity, "Destroyed entity");
    editor.scene_modified = true;
    Ok(true)
}

/// Apply a gizmo result to an entity as one undoable command
///
/// Returns false when the transform did not change.
pub fn apply_transform_edit(
    editor: &mut EditorState,
    scene: &mut Scene,
    entity: Entity,
    position: Vec3,
    rotation: Vec3,
    size: Vec3,
) -> Result<bool, EditorError> {
    let after = TransformComponent::new(position, rotation, size);
    change_component(editor, scene, entity, ComponentState::Transform(after.into()))
}

/// Record an edit that was already applied live, such as a finished gizmo drag
///
/// # Arguments
/// * `before` - Captured with [`TransformState::capture`] when the drag began
///
/// # Returns
/// Whether anything changed and a command was recorded.
pub fn record_transform_edit(
    editor: &mut EditorState,
    scene: &Scene,
    entity: Entity,
    before: TransformState,
) -> Result<bool, EditorError> {
    let after = TransformState::capture(scene, entity)?;
    if after == before {
        return Ok(false);
    }
    if let Some(command) = Command::from_states(
        entity,
        ComponentState::Transform(before),
        ComponentState::Transform(after),
    ) {
        editor.commands_mut().record(command);
        editor.scene_modified = true;
    }
    Ok(true)
}

/// Replace a component value through the command stack
pub fn change_component(
    editor: &mut EditorState,
    scene: &mut Scene,
    entity: Entity,
    state: ComponentState,
) -> Result<bool, EditorError> {
    ensure_editing(scene)?;
    let command = Command::change_component_state(scene, entity, state)?;
    if let Command::ChangeComponentState { before, after, .. } = &command {
        if before == after {
            return Ok(false);
        }
    }
    let applied = editor.commands_mut().execute(scene, command);
    editor.scene_modified |= applied;
    Ok(applied)
}

/// Add a component through the command stack
pub fn add_component(
    editor: &mut EditorState,
    scene: &mut Scene,
    entity: Entity,
    state: ComponentState,
) -> Result<bool, EditorError> {
    ensure_editing(scene)?;
    let command = Command::add_component(scene, entity, state)?;
    let applied = editor.commands_mut().execute(scene, command);
    editor.scene_modified |= applied;
    Ok(applied)
}

/// Remove a component through the command stack
pub fn remove_component(
    editor: &mut EditorState,
    scene: &mut Scene,
    entity: Entity,
    kind: ComponentKind,
) -> Result<bool, EditorError> {
    ensure_editing(scene)?;
    let command = Command::remove_component(scene, entity, kind)?;
    let applied = editor.commands_mut().execute(scene, command);
    editor.scene_modified |= applied;
    Ok(applied)
}

/// Undo the most recent edit; ignored outside edit mode
pub fn undo(editor: &mut EditorState, scene: &mut Scene) -> bool {
    if scene.state() != SceneState::Edit {
        warn!(state = ?scene.state(), "Undo is only available in edit mode");
        return false;
    }
    let undone = editor.commands_mut().undo(scene);
    editor.scene_modified |= undone;
    undone
}

/// Redo the most recently undone edit; ignored outside edit mode
pub fn redo(editor: &mut EditorState, scene: &mut Scene) -> bool {
    if scene.state() != SceneState::Edit {
        warn!(state = ?scene.state(), "Redo is only available in edit mode");
        return false;
    }
    let redone = editor.commands_mut().redo(scene);
    editor.scene_modified |= redone;
    redone
}

/// Save the scene to `path`, or to the project's last scene when `None`
///
/// The saved path becomes the project's last scene.
pub fn save_scene(
    editor: &mut EditorState,
    scene: &mut Scene,
    settings: &mut ProjectSettings,
    path: Option<&Path>,
) -> Result<PathBuf, EditorError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => settings
            .last_scene_path
            .clone()
            .ok_or(EditorError::NoScenePath)?,
    };
    SceneSerializer::save(scene, &path)?;
    if settings.last_scene_path.as_deref() != Some(path.as_path()) {
        settings.last_scene_path = Some(path.clone());
        if let Err(err) = settings.save() {
            warn!(error = %err, "Failed to update project settings");
        }
    }
    editor.scene_modified = false;
    Ok(path)
}

/// Replace the scene with a scene file
///
/// The undo history is cleared because its commands refer to the old
/// entities. On failure the current scene and history are kept.
pub fn load_scene(
    editor: &mut EditorState,
    scene: &mut Scene,
    serializer: &SceneSerializer<'_>,
    settings: &mut ProjectSettings,
    path: &Path,
) -> Result<EntityMapper, EditorError> {
    let mapper = serializer.load(scene, path)?;
    editor.clear_selection();
    editor.commands_mut().clear();
    editor.scene_modified = false;
    settings.last_scene_path = Some(path.to_path_buf());
    if let Err(err) = settings.save() {
        warn!(error = %err, "Failed to update project settings");
    }
    Ok(mapper)
}

/// Clear the scene and start over
pub fn new_scene(editor: &mut EditorState, scene: &mut Scene) {
    info!("Creating new scene");
    editor.clear_selection();
    editor.commands_mut().clear();
    scene.reset();
    scene.set_name("Untitled");
    editor.scene_modified = false;
}

/// Populate an empty scene with a camera, a light and a floor
pub fn create_default_scene(editor: &mut EditorState, scene: &mut Scene) -> Result<(), EditorError> {
    new_scene(editor, scene);

    let camera = shape::create_camera_entity(scene)?;
    scene.set_position(camera, Vec3::new(0.0, 5.0, 10.0), true)?;

    shape::create_dir_light_entity(scene)?;

    let floor = shape::create_plate_entity(scene, Vec::new())?;
    scene.set_position(floor, Vec3::new(0.0, -1.0, 0.0), true)?;

    info!(entities = scene.entity_count(), "Default scene created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::core::entity::NameComponent;

    #[test]
    fn test_create_selects_new_entity() {
        let mut scene = Scene::default();
        let mut editor = EditorState::new();
        let cube = create_entity(&mut editor, &mut scene, EntityCreationType::Cube).unwrap();

        assert_eq!(editor.selected_entity(&scene), Some(cube));
        assert!(editor.scene_modified);
        assert!(matches!(
            create_entity(&mut editor, &mut scene, EntityCreationType::Model),
            Err(EditorError::RequiresModel(_))
        ));
    }

    #[test]
    fn test_destroy_selected() {
        let mut scene = Scene::default();
        let mut editor = EditorState::new();
        let light = create_entity(&mut editor, &mut scene, EntityCreationType::PointLight).unwrap();

        assert!(destroy_selected(&mut editor, &mut scene).unwrap());
        assert!(!scene.contains(light));
        assert!(!destroy_selected(&mut editor, &mut scene).unwrap());
    }

    #[test]
    fn test_transform_edit_is_undoable() {
        let mut scene = Scene::default();
        let mut editor = EditorState::new();
        let cube = create_entity(&mut editor, &mut scene, EntityCreationType::Cube).unwrap();

        assert!(apply_transform_edit(&mut editor, &mut scene, cube, Vec3::X, Vec3::ZERO, Vec3::ONE).unwrap());
        assert!(!apply_transform_edit(&mut editor, &mut scene, cube, Vec3::X, Vec3::ZERO, Vec3::ONE).unwrap());
        assert_eq!(editor.commands().undo_len(), 1);

        assert!(undo(&mut editor, &mut scene));
        assert_eq!(scene.get::<TransformComponent>(cube).unwrap().position(), Vec3::ZERO);
        assert!(redo(&mut editor, &mut scene));
        assert_eq!(scene.get::<TransformComponent>(cube).unwrap().position(), Vec3::X);
    }

    #[test]
    fn test_recorded_drag_is_undoable() {
        let mut scene = Scene::default();
        let mut editor = EditorState::new();
        let cube = create_entity(&mut editor, &mut scene, EntityCreationType::Cube).unwrap();

        let before = TransformState::capture(&scene, cube).unwrap();
        scene.set_position(cube, Vec3::Y, true).unwrap();
        assert!(record_transform_edit(&mut editor, &scene, cube, before).unwrap());

        undo(&mut editor, &mut scene);
        assert_eq!(scene.get::<TransformComponent>(cube).unwrap().position(), Vec3::ZERO);
    }

    #[test]
    fn test_edits_rejected_while_running() {
        let mut scene = Scene::default();
        let mut editor = EditorState::new();
        let entity = create_entity(&mut editor, &mut scene, EntityCreationType::Entity).unwrap();
        scene.set_state(SceneState::Run);

        let rename = ComponentState::Name(NameComponent::new("x"));
        assert!(matches!(
            change_component(&mut editor, &mut scene, entity, rename),
            Err(EditorError::NotEditing(SceneState::Run))
        ));
        assert!(!undo(&mut editor, &mut scene));
    }

    #[test]
    fn test_new_scene_clears_history() {
        let mut scene = Scene::default();
        let mut editor = EditorState::new();
        let cube = create_entity(&mut editor, &mut scene, EntityCreationType::Cube).unwrap();
        apply_transform_edit(&mut editor, &mut scene, cube, Vec3::X, Vec3::ZERO, Vec3::ONE).unwrap();

        new_scene(&mut editor, &mut scene);
        assert_eq!(scene.entity_count(), 0);
        assert!(!editor.commands().can_undo());
        assert_eq!(editor.selected_entity(&scene), None);
    }

    #[test]
    fn test_default_scene_contents() {
        let mut scene = Scene::default();
        let mut editor = EditorState::new();
        create_default_scene(&mut editor, &mut scene).unwrap();
        assert_eq!(scene.named_entities().len(), 3);
        assert_eq!(scene.physics().body_count(), 1);
    }

    #[test]
    fn test_quick_save_needs_path() {
        let mut scene = Scene::default();
        let mut editor = EditorState::new();
        let mut settings = ProjectSettings::default();
        assert!(matches!(
            save_scene(&mut editor, &mut scene, &mut settings, None),
            Err(EditorError::NoScenePath)
        ));
    }
}
