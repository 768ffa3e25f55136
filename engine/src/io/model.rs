//! Model loading collaborator
//!
//! Parsing model files is left to the loader implementation; the scene only
//! needs the sub-mesh layout to build entities.

use crate::graphics::{Aabb, TextureSpecification};

/// One drawable part of a model
#[derive(Debug, Clone, PartialEq)]
pub struct SubMesh {
    pub bounds: Aabb,
    pub textures: Vec<TextureSpecification>,
}

/// Result of loading a model file
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    /// Path the model was loaded from
    pub path: String,
    pub meshes: Vec<SubMesh>,
}

impl ModelData {
    /// Bounds enclosing every sub-mesh
    pub fn bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .map(|mesh| mesh.bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default()
    }
}

/// Loads models from disk; errors are human-readable messages
pub trait ModelLoader {
    fn load(&self, path: &str) -> Result<ModelData, String>;
}

/// Loader that never touches the filesystem and returns a single unit cube
///
/// Used by headless tools that only need a scene's structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCubeModelLoader;

impl ModelLoader for UnitCubeModelLoader {
    fn load(&self, path: &str) -> Result<ModelData, String> {
        if path.is_empty() {
            return Err("empty model path".to_string());
        }
        Ok(ModelData {
            path: path.to_string(),
            meshes: vec![SubMesh {
                bounds: Aabb::unit(),
                textures: Vec::new(),
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_bounds_cover_all_meshes() {
        let model = ModelData {
            path: "ship.obj".into(),
            meshes: vec![
                SubMesh {
                    bounds: Aabb::new(Vec3::ZERO, Vec3::ONE),
                    textures: Vec::new(),
                },
                SubMesh {
                    bounds: Aabb::new(Vec3::splat(-2.0), Vec3::ZERO),
                    textures: Vec::new(),
                },
            ],
        };
        assert_eq!(model.bounds(), Aabb::new(Vec3::splat(-2.0), Vec3::ONE));
    }

    #[test]
    fn test_unit_cube_loader() {
        let model = UnitCubeModelLoader.load("any.obj").unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert!(UnitCubeModelLoader.load("").is_err());
    }
}
