//! Main editor state management
//!
//! This module contains the EditorState struct which tracks selection, the
//! active gizmo operation, viewport focus and the undo history.

use engine::core::entity::Entity;
use engine::graphics::MeshRendererComponent;
use engine::scene::{Scene, SceneState};
use engine::undo::CommandStack;
use tracing::debug;

/// Manipulation applied by the viewport gizmo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GizmoOperation {
    None,
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Editor UI state shared by the panels
#[derive(Debug, Default)]
pub struct EditorState {
    selected_entity: Option<Entity>,
    pub gizmo_operation: GizmoOperation,
    /// Set by the viewport panel each frame
    pub is_focused_on_viewport: bool,
    pub is_mouse_on_viewport: bool,
    /// Unsaved changes since the last save or load
    pub scene_modified: bool,
    commands: CommandStack,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor keeping at most `capacity` undo entries
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            commands: CommandStack::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Selected entity, if it is still alive
    pub fn selected_entity(&self, scene: &Scene) -> Option<Entity> {
        self.selected_entity.filter(|&entity| scene.contains(entity))
    }

    /// Select an entity and show its collider outline
    pub fn select_entity(&mut self, scene: &mut Scene, entity: Entity) {
        if self.selected_entity == Some(entity) {
            return;
        }
        self.unselect_entity(scene);
        if !scene.contains(entity) {
            return;
        }
        if let Ok(renderer) = scene.get_mut::<MeshRendererComponent>(entity) {
            renderer.show_collider = true;
        }
        debug!(entity = %entity, "Selected entity");
        self.selected_entity = Some(entity);
    }

    /// Clear the selection and hide the collider outline
    pub fn unselect_entity(&mut self, scene: &mut Scene) {
        let Some(entity) = self.selected_entity.take() else {
            return;
        };
        if let Ok(renderer) = scene.get_mut::<MeshRendererComponent>(entity) {
            renderer.show_collider = false;
        }
        debug!(entity = %entity, "Unselected entity");
    }

    /// Forget the selection without touching the scene
    ///
    /// Used when the scene the selection belonged to was replaced.
    pub fn clear_selection(&mut self) {
        self.selected_entity = None;
    }

    /// Whether the gizmo should be drawn and can edit the selection
    pub fn is_gizmo_active(&self, scene: &Scene) -> bool {
        self.gizmo_operation != GizmoOperation::None
            && scene.state() == SceneState::Edit
            && scene.is_focused_on_debug_camera()
            && self.selected_entity(scene).is_some()
    }

    pub fn commands(&self) -> &CommandStack {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut CommandStack {
        &mut self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::scene::shape;

    #[test]
    fn test_selection_toggles_collider_outline() {
        let mut scene = Scene::default();
        let first = shape::create_cube_entity(&mut scene, Vec::new()).unwrap();
        let second = shape::create_cube_entity(&mut scene, Vec::new()).unwrap();
        let mut editor = EditorState::new();

        editor.select_entity(&mut scene, first);
        assert!(scene.get::<MeshRendererComponent>(first).unwrap().show_collider);

        editor.select_entity(&mut scene, second);
        assert!(!scene.get::<MeshRendererComponent>(first).unwrap().show_collider);
        assert!(scene.get::<MeshRendererComponent>(second).unwrap().show_collider);
        assert_eq!(editor.selected_entity(&scene), Some(second));

        editor.unselect_entity(&mut scene);
        assert!(!scene.get::<MeshRendererComponent>(second).unwrap().show_collider);
        assert_eq!(editor.selected_entity(&scene), None);
    }

    #[test]
    fn test_dead_selection_reads_as_none() {
        let mut scene = Scene::default();
        let cube = shape::create_cube_entity(&mut scene, Vec::new()).unwrap();
        let mut editor = EditorState::new();
        editor.select_entity(&mut scene, cube);

        scene.destroy_entity(cube).unwrap();
        assert_eq!(editor.selected_entity(&scene), None);
        assert!(!editor.is_gizmo_active(&scene));
    }

    #[test]
    fn test_gizmo_only_in_edit_mode() {
        let mut scene = Scene::default();
        let cube = shape::create_cube_entity(&mut scene, Vec::new()).unwrap();
        let mut editor = EditorState::new();
        editor.select_entity(&mut scene, cube);
        assert!(editor.is_gizmo_active(&scene));

        scene.set_state(SceneState::Run);
        assert!(!editor.is_gizmo_active(&scene));
    }
}
