//! Keyboard shortcut dispatch

use crate::editor_state::{EditorState, GizmoOperation};
use crate::scene_operations::{self, EditorError};
use crate::settings::ProjectSettings;
use engine::scene::Scene;
use tracing::debug;

/// Keys the editor binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Q,
    W,
    E,
    R,
    S,
    Y,
    Z,
    Delete,
}

/// Modifier and mouse state at the time of a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    /// Right mouse button held; the viewport is flying the debug camera
    pub right_mouse: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        right_mouse: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        right_mouse: false,
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        right_mouse: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorShortcut {
    SetGizmo(GizmoOperation),
    DestroySelected,
    Save,
    Undo,
    Redo,
}

impl EditorShortcut {
    /// Shortcut bound to a key press, if any
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        use EditorShortcut::*;
        match (key, modifiers.ctrl, modifiers.shift) {
            (Key::S, true, _) => Some(Save),
            (Key::Z, true, false) => Some(Undo),
            (Key::Z, true, true) | (Key::Y, true, _) => Some(Redo),
            (Key::Q, false, _) => Some(SetGizmo(GizmoOperation::None)),
            (Key::W, false, _) => Some(SetGizmo(GizmoOperation::Translate)),
            (Key::E, false, _) => Some(SetGizmo(GizmoOperation::Rotate)),
            (Key::R, false, _) => Some(SetGizmo(GizmoOperation::Scale)),
            (Key::Delete, _, _) => Some(DestroySelected),
            _ => None,
        }
    }
}

/// Run the shortcut for a key press
///
/// Returns whether a shortcut took effect. Gizmo keys only apply while the
/// viewport has focus, an entity is selected and the camera is not being
/// flown. Saving a scene that has never been saved fails with
/// [`EditorError::NoScenePath`] so the caller can ask for a file.
pub fn handle_key(
    editor: &mut EditorState,
    scene: &mut Scene,
    settings: &mut ProjectSettings,
    key: Key,
    modifiers: Modifiers,
) -> Result<bool, EditorError> {
    let Some(shortcut) = EditorShortcut::from_key(key, modifiers) else {
        return Ok(false);
    };
    debug!(shortcut = ?shortcut, "Dispatching shortcut");
    match shortcut {
        EditorShortcut::SetGizmo(operation) => {
            let allowed = editor.is_focused_on_viewport
                && !modifiers.right_mouse
                && editor.selected_entity(scene).is_some();
            if allowed {
                editor.gizmo_operation = operation;
            }
            Ok(allowed)
        }
        EditorShortcut::DestroySelected => scene_operations::destroy_selected(editor, scene),
        EditorShortcut::Save => {
            scene_operations::save_scene(editor, scene, settings, None)?;
            Ok(true)
        }
        EditorShortcut::Undo => Ok(scene_operations::undo(editor, scene)),
        EditorShortcut::Redo => Ok(scene_operations::redo(editor, scene)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::scene::shape;

    #[test]
    fn test_bindings() {
        assert_eq!(EditorShortcut::from_key(Key::S, Modifiers::CTRL), Some(EditorShortcut::Save));
        assert_eq!(EditorShortcut::from_key(Key::Z, Modifiers::CTRL), Some(EditorShortcut::Undo));
        assert_eq!(EditorShortcut::from_key(Key::Z, Modifiers::CTRL_SHIFT), Some(EditorShortcut::Redo));
        assert_eq!(EditorShortcut::from_key(Key::Y, Modifiers::CTRL), Some(EditorShortcut::Redo));
        assert_eq!(EditorShortcut::from_key(Key::S, Modifiers::NONE), None);
        assert_eq!(
            EditorShortcut::from_key(Key::E, Modifiers::NONE),
            Some(EditorShortcut::SetGizmo(GizmoOperation::Rotate))
        );
    }

    #[test]
    fn test_gizmo_keys_need_focus_and_selection() {
        let mut scene = Scene::default();
        let mut settings = ProjectSettings::default();
        let mut editor = EditorState::new();
        let cube = shape::create_cube_entity(&mut scene, Vec::new()).unwrap();

        assert!(!handle_key(&mut editor, &mut scene, &mut settings, Key::R, Modifiers::NONE).unwrap());
        assert_eq!(editor.gizmo_operation, GizmoOperation::Translate);

        editor.is_focused_on_viewport = true;
        assert!(!handle_key(&mut editor, &mut scene, &mut settings, Key::R, Modifiers::NONE).unwrap());

        editor.select_entity(&mut scene, cube);
        let flying = Modifiers {
            right_mouse: true,
            ..Modifiers::NONE
        };
        assert!(!handle_key(&mut editor, &mut scene, &mut settings, Key::R, flying).unwrap());
        assert!(handle_key(&mut editor, &mut scene, &mut settings, Key::R, Modifiers::NONE).unwrap());
        assert_eq!(editor.gizmo_operation, GizmoOperation::Scale);
    }

    #[test]
    fn test_delete_key() {
        let mut scene = Scene::default();
        let mut settings = ProjectSettings::default();
        let mut editor = EditorState::new();
        let cube = shape::create_cube_entity(&mut scene, Vec::new()).unwrap();
        editor.select_entity(&mut scene, cube);

        assert!(handle_key(&mut editor, &mut scene, &mut settings, Key::Delete, Modifiers::NONE).unwrap());
        assert!(!scene.contains(cube));
    }
}
