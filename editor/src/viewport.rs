//! Viewport picking and framebuffer sizing
//!
//! The viewport shows the scene framebuffer. Clicking it reads the picking
//! attachment under the cursor to select the entity drawn there.

use crate::editor_state::EditorState;
use engine::core::entity::{Entity, NameComponent, Parent};
use engine::graphics::{FrameBuffer, ENTITY_ID_ATTACHMENT, NO_ENTITY};
use engine::scene::Scene;
use glam::Vec2;
use tracing::trace;

/// Select whatever is drawn at framebuffer pixel (`x`, `y`)
///
/// Unnamed model parts resolve to the named entity they belong to. Empty
/// pixels and ids of entities that no longer exist clear the selection.
pub fn pick(
    editor: &mut EditorState,
    scene: &mut Scene,
    framebuffer: &dyn FrameBuffer,
    x: i32,
    y: i32,
) -> Option<Entity> {
    let id = framebuffer.read_pixel(ENTITY_ID_ATTACHMENT, x, y);
    trace!(x, y, id, "Picking");
    let picked = if id == NO_ENTITY {
        None
    } else {
        scene
            .entity_from_id(id)
            .and_then(|entity| named_root(scene, entity))
    };
    match picked {
        Some(entity) => editor.select_entity(scene, entity),
        None => editor.unselect_entity(scene),
    }
    picked
}

/// Walk `Parent` links up to the first named entity
fn named_root(scene: &Scene, entity: Entity) -> Option<Entity> {
    let mut current = entity;
    let mut visited = vec![current];
    while !scene.has::<NameComponent>(current) {
        let parent = scene.get::<Parent>(current).ok()?.0;
        if visited.contains(&parent) {
            return None;
        }
        visited.push(parent);
        current = parent;
    }
    Some(current)
}

/// Convert a cursor position relative to the viewport's top-left corner into
/// framebuffer pixel coordinates, whose origin is bottom-left
///
/// Returns `None` when the cursor is outside the viewport.
pub fn cursor_to_pixel(cursor: Vec2, viewport_size: Vec2) -> Option<(i32, i32)> {
    let pixel = Vec2::new(cursor.x, viewport_size.y - cursor.y);
    let inside = pixel.x >= 0.0 && pixel.y >= 0.0 && pixel.x < viewport_size.x && pixel.y < viewport_size.y;
    inside.then(|| (pixel.x as i32, pixel.y as i32))
}

/// One frame of viewport mouse state as reported by the GUI
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportInput {
    /// Cursor relative to the viewport's top-left corner
    pub cursor: Vec2,
    pub size: Vec2,
    /// Left button went down this frame
    pub clicked: bool,
    /// The gizmo is being dragged
    pub gizmo_in_use: bool,
}

/// Update hover state and pick on click
///
/// Picking only happens while the scene is viewed through the debug camera.
pub fn handle_viewport_input(
    editor: &mut EditorState,
    scene: &mut Scene,
    framebuffer: &dyn FrameBuffer,
    input: &ViewportInput,
) -> Option<Entity> {
    if !scene.is_focused_on_debug_camera() {
        return None;
    }
    let Some((x, y)) = cursor_to_pixel(input.cursor, input.size) else {
        editor.is_mouse_on_viewport = false;
        return None;
    };
    editor.is_mouse_on_viewport = true;
    if input.clicked && !input.gizmo_in_use {
        pick(editor, scene, framebuffer, x, y)
    } else {
        None
    }
}

/// Match the framebuffer and scene cameras to the viewport panel size
///
/// Returns true if a resize happened.
pub fn sync_viewport_size(
    scene: &mut Scene,
    framebuffer: &mut dyn FrameBuffer,
    width: u32,
    height: u32,
) -> bool {
    if width == 0 || height == 0 || framebuffer.size() == (width, height) {
        return false;
    }
    framebuffer.resize(width, height);
    scene.resize_viewport(width as f32, height as f32);
    true
}
