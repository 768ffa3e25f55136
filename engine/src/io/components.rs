//! Persisted layout of each component block
//!
//! Field names are part of the file format and must not change.

use crate::core::audio::AudioComponent;
use crate::core::camera::{
    CameraComponent, OrthographicSpecification, PerspectiveSpecification, ProjectionType,
};
use crate::core::entity::TransformComponent;
use crate::core::light::{LightComponent, LightType};
use crate::graphics::{Material, MeshComponent, MeshRendererComponent, TextureSpecification};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Block keys in the order they are written
pub const CREATION_TYPE_KEY: &str = "CreationTypeComponent";
pub const NAME_KEY: &str = "NameComponent";
pub const TRANSFORM_KEY: &str = "TransformComponent";
pub const MESH_KEY: &str = "MeshComponent";
pub const MESH_RENDERER_KEY: &str = "MeshRendererComponent";
pub const CAMERA_KEY: &str = "CameraComponent";
pub const LIGHT_KEY: &str = "LightComponent";
pub const PHYSICS_KEY: &str = "PhysicsComponent";
pub const SCRIPT_KEY: &str = "ScriptComponent";
pub const AUDIO_KEY: &str = "AudioComponent";
pub const ENTITY_ID_KEY: &str = "Entity ID";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreationTypeData {
    #[serde(rename = "Type")]
    pub kind: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NameData {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransformData {
    pub position: Vec3,
    pub rotation: Vec3,
    pub size: Vec3,
}

impl From<&TransformComponent> for TransformData {
    fn from(transform: &TransformComponent) -> Self {
        Self {
            position: transform.position(),
            rotation: transform.rotation(),
            size: transform.size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextureData {
    pub img_path: String,
    pub tex_number: u32,
    pub tex_type: u32,
    pub in_out_tex_format: u32,
}

impl From<&TextureSpecification> for TextureData {
    fn from(texture: &TextureSpecification) -> Self {
        Self {
            img_path: texture.img_path.clone(),
            tex_number: texture.tex_number,
            tex_type: texture.tex_type,
            in_out_tex_format: texture.in_out_tex_format,
        }
    }
}

impl From<TextureData> for TextureSpecification {
    fn from(data: TextureData) -> Self {
        Self {
            img_path: data.img_path,
            tex_number: data.tex_number,
            tex_type: data.tex_type,
            in_out_tex_format: data.in_out_tex_format,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeshData {
    #[serde(default)]
    pub model_path: String,
    #[serde(default)]
    pub textures: Vec<TextureData>,
}

impl MeshData {
    pub fn texture_specifications(&self) -> Vec<TextureSpecification> {
        self.textures.iter().cloned().map(Into::into).collect()
    }
}

impl From<&MeshComponent> for MeshData {
    fn from(mesh: &MeshComponent) -> Self {
        Self {
            model_path: mesh.model_path.clone(),
            textures: mesh.textures.iter().map(TextureData::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MaterialData {
    pub ambient: f32,
    pub diffuse: f32,
    pub shininess: f32,
    pub specular: f32,
    pub obj_color: Vec3,
}

impl From<Material> for MaterialData {
    fn from(material: Material) -> Self {
        Self {
            ambient: material.ambient,
            diffuse: material.diffuse,
            shininess: material.shininess,
            specular: material.specular,
            obj_color: material.obj_color,
        }
    }
}

impl From<MaterialData> for Material {
    fn from(data: MaterialData) -> Self {
        Self {
            obj_color: data.obj_color,
            ambient: data.ambient,
            diffuse: data.diffuse,
            specular: data.specular,
            shininess: data.shininess,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShadersData {
    pub vert_path: String,
    pub frag_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeshRendererData {
    pub material: MaterialData,
    pub shaders: ShadersData,
}

impl From<&MeshRendererComponent> for MeshRendererData {
    fn from(renderer: &MeshRendererComponent) -> Self {
        Self {
            material: renderer.material.into(),
            shaders: ShadersData {
                vert_path: renderer.shader.vertex_path.clone(),
                frag_path: renderer.shader.fragment_path.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PerspectiveData {
    #[serde(rename = "FOV")]
    pub fov: f32,
    pub wnd_width: f32,
    pub wnd_height: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrthographicData {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CameraData {
    pub is_focused_on: bool,
    #[serde(rename = "Type")]
    pub kind: i32,
    pub perspective_specification: PerspectiveData,
    pub orthographic_specification: OrthographicData,
}

impl From<&CameraComponent> for CameraData {
    fn from(camera: &CameraComponent) -> Self {
        let p = camera.perspective;
        let o = camera.orthographic;
        Self {
            is_focused_on: camera.is_focused_on,
            kind: camera.projection.as_i32(),
            perspective_specification: PerspectiveData {
                fov: p.fov,
                wnd_width: p.wnd_width,
                wnd_height: p.wnd_height,
                near: p.near,
                far: p.far,
            },
            orthographic_specification: OrthographicData {
                left: o.left,
                right: o.right,
                bottom: o.bottom,
                top: o.top,
                near: o.near,
                far: o.far,
            },
        }
    }
}

impl CameraData {
    /// Rebuild the component; `None` for an unknown projection type
    pub fn to_component(&self) -> Option<CameraComponent> {
        let p = self.perspective_specification;
        let o = self.orthographic_specification;
        Some(CameraComponent {
            is_focused_on: self.is_focused_on,
            projection: ProjectionType::from_i32(self.kind)?,
            perspective: PerspectiveSpecification {
                fov: p.fov,
                wnd_width: p.wnd_width,
                wnd_height: p.wnd_height,
                near: p.near,
                far: p.far,
            },
            orthographic: OrthographicSpecification {
                left: o.left,
                right: o.right,
                bottom: o.bottom,
                top: o.top,
                near: o.near,
                far: o.far,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LightData {
    pub cast_shadows: bool,
    #[serde(rename = "Type")]
    pub kind: i32,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub color: Vec3,
}

impl From<&LightComponent> for LightData {
    fn from(light: &LightComponent) -> Self {
        Self {
            cast_shadows: light.cast_shadows,
            kind: light.light_type().as_i32(),
            constant: light.constant,
            linear: light.linear,
            quadratic: light.quadratic,
            inner_radius: light.inner_radius,
            outer_radius: light.outer_radius,
            color: light.color,
        }
    }
}

impl LightData {
    /// Rebuild the component; `None` for an unknown light type
    pub fn to_component(&self) -> Option<LightComponent> {
        Some(LightComponent::from_parts(
            LightType::from_i32(self.kind)?,
            self.color,
            self.inner_radius,
            self.outer_radius,
            self.constant,
            self.linear,
            self.quadratic,
            self.cast_shadows,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PhysicsData {
    #[serde(rename = "Type")]
    pub kind: i32,
    pub mass: f32,
    pub position: Vec3,
    /// Quaternion as `[x, y, z, w]`
    pub rotation: Quat,
    /// Extents of the mesh bounds the collider is fitted to
    pub size: Vec3,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScriptData {
    pub behavior_class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioData {
    pub source_path: String,
    pub volume: f32,
    #[serde(default)]
    pub looping: bool,
}

impl From<&AudioComponent> for AudioData {
    fn from(audio: &AudioComponent) -> Self {
        Self {
            source_path: audio.source_path.clone(),
            volume: audio.volume,
            looping: audio.looping,
        }
    }
}

impl From<AudioData> for AudioComponent {
    fn from(data: AudioData) -> Self {
        AudioComponent::new(data.source_path)
            .with_volume(data.volume)
            .with_looping(data.looping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_keys() {
        let data = TransformData::from(&TransformComponent::from_position(Vec3::new(1.0, 2.0, 3.0)));
        let value = serde_json::to_value(data).unwrap();
        assert_eq!(
            value,
            json!({ "Position": [1.0, 2.0, 3.0], "Rotation": [0.0, 0.0, 0.0], "Size": [1.0, 1.0, 1.0] })
        );
    }

    #[test]
    fn test_camera_keys() {
        let value = serde_json::to_value(CameraData::from(&CameraComponent::default())).unwrap();
        assert_eq!(value["IsFocusedOn"], json!(true));
        assert_eq!(value["Type"], json!(0));
        assert!(value["PerspectiveSpecification"]["FOV"].is_number());
        assert!(value["OrthographicSpecification"]["Left"].is_number());
    }

    #[test]
    fn test_light_restores_exactly() {
        let mut light = LightComponent::new(LightType::Dir);
        light.linear = 0.5;
        let restored = LightData::from(&light).to_component().unwrap();
        assert_eq!(restored, light);

        let mut bad = LightData::from(&light);
        bad.kind = 7;
        assert!(bad.to_component().is_none());
    }

    #[test]
    fn test_mesh_textures_default_empty() {
        let mesh: MeshData = serde_json::from_value(json!({ "ModelPath": "m.obj" })).unwrap();
        assert!(mesh.textures.is_empty());
        let texture: TextureData = serde_json::from_value(json!({
            "ImgPath": "wood.png", "TexNumber": 0, "TexType": 3553, "InOutTexFormat": 6408
        }))
        .unwrap();
        assert_eq!(TextureSpecification::from(texture).tex_type, 3553);
    }

    #[test]
    fn test_physics_rotation_is_xyzw() {
        let data = PhysicsData {
            kind: 0,
            mass: 1.0,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            size: Vec3::ONE,
        };
        let value = serde_json::to_value(data).unwrap();
        assert_eq!(value["Rotation"], json!([0.0, 0.0, 0.0, 1.0]));
    }
}
