//! Core components for the entity system

use super::entity::Entity;
use crate::component_system::Component;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Display name of an entity
///
/// Also marks an entity as user-facing: entities without a name are scaffolding
/// (model sub-meshes) and are skipped by the hierarchy view and the serializer.
#[derive(Debug, Clone, Default, PartialEq, Component)]
#[component(name = "NameComponent")]
pub struct NameComponent(pub String);

impl NameComponent {
    /// Create a new name component
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// How an entity was created, used to rebuild it through the matching shape factory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EntityCreationType {
    #[default]
    Entity = 0,
    Cube = 1,
    Plate = 2,
    Cubemap = 3,
    PointLight = 4,
    SpotLight = 5,
    DirLight = 6,
    Camera = 7,
    Model = 8,
}

impl EntityCreationType {
    /// Persisted integer value
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Parse a persisted integer value
    pub fn from_i32(value: i32) -> Option<Self> {
        Some(match value {
            0 => Self::Entity,
            1 => Self::Cube,
            2 => Self::Plate,
            3 => Self::Cubemap,
            4 => Self::PointLight,
            5 => Self::SpotLight,
            6 => Self::DirLight,
            7 => Self::Camera,
            8 => Self::Model,
            _ => return None,
        })
    }

    /// Default display name for a freshly created entity of this type
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Entity => "Entity",
            Self::Cube => "Cube",
            Self::Plate => "Plate",
            Self::Cubemap => "Cubemap",
            Self::PointLight => "Point Light",
            Self::SpotLight => "Spot Light",
            Self::DirLight => "Directional Light",
            Self::Camera => "Camera",
            Self::Model => "Model",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Component)]
#[component(name = "CreationTypeComponent")]
pub struct CreationTypeComponent(pub EntityCreationType);

/// Parent link used by transform propagation
///
/// Runtime only: model sub-meshes are re-parented when their model is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
#[component(name = "Parent")]
pub struct Parent(pub Entity);

/// Convert Euler angles in degrees to a quaternion (X, then Y, then Z)
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Inverse of [`euler_degrees_to_quat`]
pub fn quat_to_euler_degrees(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Rotation matrix for Euler angles in degrees, composed as Rx * Ry * Rz
pub fn euler_rotation_matrix(degrees: Vec3) -> Mat4 {
    Mat4::from_rotation_x(degrees.x.to_radians())
        * Mat4::from_rotation_y(degrees.y.to_radians())
        * Mat4::from_rotation_z(degrees.z.to_radians())
}

/// Position, rotation (Euler degrees) and size of an entity
///
/// The model matrix is cached and rebuilt lazily by [`TransformComponent::model`]
/// after any setter ran. Zero sizes are allowed and yield a singular matrix.
#[derive(Debug, Clone, Component)]
#[component(name = "TransformComponent")]
pub struct TransformComponent {
    position: Vec3,
    rotation: Vec3,
    size: Vec3,
    model: Mat4,
    dirty: bool,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE)
    }
}

impl PartialEq for TransformComponent {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.rotation == other.rotation && self.size == other.size
    }
}

impl TransformComponent {
    pub fn new(position: Vec3, rotation: Vec3, size: Vec3) -> Self {
        Self {
            position,
            rotation,
            size,
            model: Mat4::IDENTITY,
            dirty: true,
        }
    }

    /// Create a transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO, Vec3::ONE)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Rotation as Euler angles in degrees
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Rotation as a quaternion
    pub fn orientation(&self) -> Quat {
        euler_degrees_to_quat(self.rotation)
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.dirty = true;
    }

    /// Add Euler angles in degrees
    pub fn rotate(&mut self, degrees: Vec3) {
        self.rotation += degrees;
        self.dirty = true;
    }

    /// Multiply the size component-wise
    pub fn scale(&mut self, factor: Vec3) {
        self.size *= factor;
        self.dirty = true;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_rotation(&mut self, degrees: Vec3) {
        self.rotation = degrees;
        self.dirty = true;
    }

    pub fn set_size(&mut self, size: Vec3) {
        self.size = size;
        self.dirty = true;
    }

    /// Rotate the position about a pivot by Euler angles in degrees
    ///
    /// Builds translate(pivot) * rotate * translate(-pivot) on every call.
    pub fn rotate_around_origin(&mut self, degrees: Vec3, origin: Vec3) {
        let pivot = Mat4::from_translation(origin)
            * euler_rotation_matrix(degrees)
            * Mat4::from_translation(-origin);
        self.position = pivot.transform_point3(self.position);
        self.dirty = true;
    }

    /// Whether the cached model matrix is stale
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Model matrix, recomputed only when a setter ran since the last call
    pub fn model(&mut self) -> Mat4 {
        if self.dirty {
            self.model = self.compute_model();
            self.dirty = false;
        }
        self.model
    }

    /// Build the model matrix from scratch: translate * Rx * Ry * Rz * scale
    pub fn compute_model(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * euler_rotation_matrix(self.rotation)
            * Mat4::from_scale(self.size)
    }

    pub fn forward(&self) -> Vec3 {
        euler_rotation_matrix(self.rotation)
            .transform_vector3(Vec3::NEG_Z)
            .normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        euler_rotation_matrix(self.rotation)
            .transform_vector3(Vec3::X)
            .normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        euler_rotation_matrix(self.rotation)
            .transform_vector3(Vec3::Y)
            .normalize_or_zero()
    }
}
