//! Plain-old-data uniform layouts handed to render backends
//!
//! All structs are `#[repr(C)]` and `Pod`, padded to 16-byte rows, so a
//! backend can upload them with `bytemuck::cast_slice` without conversion.

use crate::core::entity::TransformComponent;
use crate::core::light::{LightComponent, LightType};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Camera uniform buffer data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    /// Combined view-projection matrix
    pub view_proj: [[f32; 4]; 4],
    /// World-space eye position, w unused
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn new(view_proj: Mat4, position: glam::Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            position: position.extend(1.0).to_array(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Per-object data: model matrix and picking id
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Entity id written to the picking attachment, padded to a full row
    pub id: [i32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, entity_id: i32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            id: [entity_id, 0, 0, 0],
        }
    }
}

/// One light as seen by the lighting shader
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// World-space position, w unused
    pub position: [f32; 4],
    /// World-space direction (transform forward), w unused
    pub direction: [f32; 4],
    /// RGB colour, w = 1 when the light casts shadows
    pub color: [f32; 4],
    /// constant, linear, quadratic, light type
    pub attenuation: [f32; 4],
    /// cos(inner), cos(outer) of the spot cone, zw unused
    pub cutoff: [f32; 4],
}

impl LightUniform {
    pub fn from_light(light: &LightComponent, transform: &TransformComponent) -> Self {
        let light_type = match light.light_type() {
            LightType::Dir => 0.0,
            LightType::Point => 1.0,
            LightType::Spot => 2.0,
        };
        Self {
            position: transform.position().extend(1.0).to_array(),
            direction: transform.forward().extend(0.0).to_array(),
            color: light
                .color
                .extend(if light.cast_shadows { 1.0 } else { 0.0 })
                .to_array(),
            attenuation: [light.constant, light.linear, light.quadratic, light_type],
            cutoff: [
                light.inner_radius.to_radians().cos(),
                light.outer_radius.to_radians().cos(),
                0.0,
                0.0,
            ],
        }
    }
}
