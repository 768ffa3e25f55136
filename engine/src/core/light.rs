//! Light component

use crate::component_system::Component;
use glam::Vec3;

/// Warm white used by directional lights
pub const DIR_LIGHT_COLOR: Vec3 = Vec3::new(0.9922, 0.9843, 0.8275);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LightType {
    Dir,
    #[default]
    Point,
    Spot,
}

impl LightType {
    /// Persisted integer value
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Dir => 0,
            Self::Point => 1,
            Self::Spot => 2,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Dir),
            1 => Some(Self::Point),
            2 => Some(Self::Spot),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dir => "dir",
            Self::Point => "point",
            Self::Spot => "spot",
        }
    }
}

/// Light source attached to an entity; position and direction come from its transform
#[derive(Debug, Clone, PartialEq, Component)]
#[component(name = "LightComponent")]
pub struct LightComponent {
    pub color: Vec3,
    /// Spot cone inner angle in degrees
    pub inner_radius: f32,
    /// Spot cone outer angle in degrees
    pub outer_radius: f32,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    light_type: LightType,
    pub cast_shadows: bool,
}

impl Default for LightComponent {
    fn default() -> Self {
        Self::new(LightType::Point)
    }
}

impl LightComponent {
    /// Light of the given type with default attenuation
    ///
    /// Directional lights cast shadows and use [`DIR_LIGHT_COLOR`].
    pub fn new(light_type: LightType) -> Self {
        let is_dir = light_type == LightType::Dir;
        Self {
            color: if is_dir { DIR_LIGHT_COLOR } else { Vec3::ONE },
            inner_radius: 15.0,
            outer_radius: 20.0,
            constant: 1.0,
            linear: 0.045,
            quadratic: 0.0075,
            light_type,
            cast_shadows: is_dir,
        }
    }

    pub fn light_type(&self) -> LightType {
        self.light_type
    }

    /// Change the light type; shadow casting is switched off
    pub fn set_type(&mut self, light_type: LightType) {
        self.light_type = light_type;
        self.cast_shadows = false;
    }

    /// Restore persisted fields exactly, without the side effects of [`Self::set_type`]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        light_type: LightType,
        color: Vec3,
        inner_radius: f32,
        outer_radius: f32,
        constant: f32,
        linear: f32,
        quadratic: f32,
        cast_shadows: bool,
    ) -> Self {
        Self {
            color,
            inner_radius,
            outer_radius,
            constant,
            linear,
            quadratic,
            light_type,
            cast_shadows,
        }
    }
}
