//! Camera component and the editor debug camera
//!
//! Provides perspective and orthographic projections, and view matrix
//! calculation from an entity transform.

use crate::component_system::Component;
use crate::core::entity::TransformComponent;
use crate::graphics::renderer::ViewSpecification;
use glam::{Mat4, Vec3};

/// Projection mode of a scene camera
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectionType {
    #[default]
    Perspective,
    Orthographic,
}

impl ProjectionType {
    /// Persisted integer value
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Perspective => 0,
            Self::Orthographic => 1,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Perspective),
            1 => Some(Self::Orthographic),
            _ => None,
        }
    }
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveSpecification {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub wnd_width: f32,
    pub wnd_height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveSpecification {
    fn default() -> Self {
        Self {
            fov: 45.0,
            wnd_width: 800.0,
            wnd_height: 600.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl PerspectiveSpecification {
    /// Width over height; 1.0 for a degenerate window
    pub fn aspect_ratio(&self) -> f32 {
        if self.wnd_height > 0.0 {
            self.wnd_width / self.wnd_height
        } else {
            1.0
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect_ratio(), self.near, self.far)
    }
}

/// Orthographic projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicSpecification {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrthographicSpecification {
    fn default() -> Self {
        Self {
            left: -10.0,
            right: 10.0,
            bottom: -10.0,
            top: 10.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl OrthographicSpecification {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

/// Scene camera attached to an entity
#[derive(Debug, Clone, PartialEq, Component)]
#[component(name = "CameraComponent")]
pub struct CameraComponent {
    /// Whether this camera drives the viewport when the debug camera is not in use
    pub is_focused_on: bool,
    pub projection: ProjectionType,
    pub perspective: PerspectiveSpecification,
    pub orthographic: OrthographicSpecification,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            is_focused_on: true,
            projection: ProjectionType::Perspective,
            perspective: PerspectiveSpecification::default(),
            orthographic: OrthographicSpecification::default(),
        }
    }
}

impl CameraComponent {
    /// Calculate the projection matrix for the active projection type
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            ProjectionType::Perspective => self.perspective.projection_matrix(),
            ProjectionType::Orthographic => self.orthographic.projection_matrix(),
        }
    }

    /// View matrix looking along the transform's forward axis
    pub fn view_matrix(transform: &TransformComponent) -> Mat4 {
        Mat4::look_to_rh(transform.position(), transform.forward(), transform.up())
    }

    pub fn view_specification(&self, transform: &TransformComponent) -> ViewSpecification {
        ViewSpecification {
            view: Self::view_matrix(transform),
            projection: self.projection_matrix(),
            position: transform.position(),
        }
    }

    /// Update the viewport size (useful when the window resizes)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.perspective.wnd_width = width;
        self.perspective.wnd_height = height;
    }
}

/// Free-flying editor camera, owned by the application rather than the scene
#[derive(Debug, Clone, PartialEq)]
pub struct DebugCamera {
    pub position: Vec3,
    /// Rotation about the world Y axis, in degrees
    pub yaw: f32,
    /// Rotation about the camera's right axis, in degrees, clamped to +-89
    pub pitch: f32,
    pub perspective: PerspectiveSpecification,
}

impl Default for DebugCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 8.0),
            yaw: -90.0,
            pitch: 0.0,
            perspective: PerspectiveSpecification::default(),
        }
    }
}

impl DebugCamera {
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    /// Turn the camera by yaw/pitch deltas in degrees
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-89.0, 89.0);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn view_specification(&self) -> ViewSpecification {
        ViewSpecification {
            view: self.view_matrix(),
            projection: self.perspective.projection_matrix(),
            position: self.position,
        }
    }
}
