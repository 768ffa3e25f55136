//! Surface material carried by mesh renderers
//!
//! Phong-style coefficients plus an object colour. The GPU-side layout is
//! provided by [`MaterialUniform`] for render backends that upload it directly.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Material properties of a rendered mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base colour (RGB)
    pub obj_color: Vec3,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            obj_color: Vec3::ONE,
            ambient: 0.25,
            diffuse: 0.5,
            specular: 0.5,
            shininess: 64.0,
        }
    }
}

impl Material {
    /// Default coefficients with the given colour
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            obj_color: Vec3::new(r, g, b),
            ..Default::default()
        }
    }

    /// Common preset: gray material
    pub fn gray(value: f32) -> Self {
        Self::from_rgb(value, value, value)
    }
}

/// Material data for GPU uniform buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MaterialUniform {
    /// RGB colour, alpha unused
    pub obj_color: [f32; 4],
    /// ambient, diffuse, specular, shininess
    pub coefficients: [f32; 4],
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        Self {
            obj_color: material.obj_color.extend(1.0).to_array(),
            coefficients: [
                material.ambient,
                material.diffuse,
                material.specular,
                material.shininess,
            ],
        }
    }
}
