//! Render backend collaborator interface
//!
//! The scene gathers what to draw each frame and hands it to a backend
//! through [`RenderBackend`]. How the backend uploads, batches and shades
//! the items is its own business.

use super::material::Material;
use super::mesh::Aabb;
use super::uniform::LightUniform;
use crate::core::entity::Entity;
use crate::shaders::ShaderProgram;
use glam::{Mat4, Vec3};
use std::sync::Arc;

/// Camera matrices for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSpecification {
    pub view: Mat4,
    pub projection: Mat4,
    /// World-space eye position
    pub position: Vec3,
}

impl ViewSpecification {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// One mesh to draw
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub entity: Entity,
    /// Value for the picking attachment
    pub entity_id: i32,
    pub registry_id: String,
    pub model: Mat4,
    pub material: Material,
    pub shader: Arc<ShaderProgram>,
    /// World-space collider bounds, present while the collider outline is shown
    pub collider: Option<Aabb>,
}

/// Backend that turns draw items into pixels
pub trait RenderBackend {
    fn begin_frame(&mut self, view: &ViewSpecification);
    fn set_lights(&mut self, lights: &[LightUniform]);
    fn draw(&mut self, item: &DrawItem);
    fn end_frame(&mut self);
}

/// Backend that only records what it was asked to draw
///
/// Used by headless tools and tests.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub frames: usize,
    pub view: Option<ViewSpecification>,
    pub lights: Vec<LightUniform>,
    pub items: Vec<DrawItem>,
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, view: &ViewSpecification) {
        self.view = Some(*view);
        self.lights.clear();
        self.items.clear();
    }

    fn set_lights(&mut self, lights: &[LightUniform]) {
        self.lights = lights.to_vec();
    }

    fn draw(&mut self, item: &DrawItem) {
        self.items.push(item.clone());
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}
