//! Scene editor model for the engine
//!
//! This crate holds the editor state behind the GUI: selection, the gizmo
//! operation, viewport picking, editor actions that drive the command stack,
//! keyboard shortcuts and project settings. Widget rendering lives elsewhere.

pub mod editor_state;
pub mod input;
pub mod scene_operations;
pub mod settings;
pub mod viewport;

pub use editor_state::{EditorState, GizmoOperation};
pub use input::{handle_key, EditorShortcut, Key, Modifiers};
pub use scene_operations::EditorError;
pub use settings::{ProjectSettings, SettingsError};
pub use viewport::{handle_viewport_input, pick, ViewportInput};
