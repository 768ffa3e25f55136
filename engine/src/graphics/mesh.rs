//! Mesh and mesh renderer components
//!
//! Vertex data lives in the render backend's mesh registry; entities only
//! reference it by registry id together with the bounds the physics collider
//! is sized from.

use super::material::Material;
use crate::component_system::Component;
use crate::shaders::ShaderProgram;
use glam::{Mat4, Vec3};
use std::sync::Arc;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Unit cube centred at the origin
    pub fn unit() -> Self {
        Self::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5))
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Create an AABB from a list of points
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::new(Vec3::ZERO, Vec3::ZERO);
        };
        rest.iter()
            .fold(Self::new(*first, *first), |aabb, point| Self {
                min: aabb.min.min(*point),
                max: aabb.max.max(*point),
            })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Whether the boxes overlap with positive volume
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Bounds of the box after transforming its eight corners
    pub fn transform(&self, transform: Mat4) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let transformed: Vec<Vec3> = corners
            .iter()
            .map(|&corner| transform.transform_point3(corner))
            .collect();
        Self::from_points(&transformed)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::unit()
    }
}

/// A texture bound to a mesh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureSpecification {
    pub img_path: String,
    /// Texture unit the image is bound to
    pub tex_number: u32,
    /// Backend texture target (2D, cube map)
    pub tex_type: u32,
    /// Backend pixel format used for both upload and storage
    pub in_out_tex_format: u32,
}

/// Geometry reference of an entity
#[derive(Debug, Clone, PartialEq, Component)]
#[component(name = "MeshComponent")]
pub struct MeshComponent {
    /// Key of the vertex data in the backend mesh registry
    pub registry_id: String,
    /// Source file for imported models, empty for built-in shapes
    pub model_path: String,
    pub textures: Vec<TextureSpecification>,
    /// Local-space bounds; runtime only, rebuilt by the shape factories
    pub bounds: Aabb,
}

impl MeshComponent {
    pub fn new(registry_id: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            registry_id: registry_id.into(),
            model_path: String::new(),
            textures: Vec::new(),
            bounds,
        }
    }

    pub fn with_textures(mut self, textures: Vec<TextureSpecification>) -> Self {
        self.textures = textures;
        self
    }
}

/// Draw state of an entity: material, shared shader and picking id
#[derive(Debug, Clone, Component)]
#[component(name = "MeshRendererComponent")]
pub struct MeshRendererComponent {
    pub material: Material,
    pub shader: Arc<ShaderProgram>,
    pub registry_id: String,
    /// Value written to the picking attachment for this entity
    pub entity_id: i32,
    /// Draw the physics collider outline (set while selected in the editor)
    pub show_collider: bool,
}

impl MeshRendererComponent {
    pub fn new(shader: Arc<ShaderProgram>, entity_id: i32, registry_id: impl Into<String>) -> Self {
        Self {
            material: Material::default(),
            shader,
            registry_id: registry_id.into(),
            entity_id,
            show_collider: false,
        }
    }
}

impl PartialEq for MeshRendererComponent {
    fn eq(&self, other: &Self) -> bool {
        self.material == other.material
            && *self.shader == *other.shader
            && self.registry_id == other.registry_id
            && self.entity_id == other.entity_id
            && self.show_collider == other.show_collider
    }
}
