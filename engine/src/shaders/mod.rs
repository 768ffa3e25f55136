//! Shader program handles and the content-addressed shader cache
//!
//! Compilation belongs to the render backend; the core only tracks which
//! vertex/fragment pair each renderer uses so identical pairs share one program.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Default lit shader used by cubes, plates and models
pub const DEFAULT_VERTEX_SHADER: &str = "shaders/default.vert";
pub const DEFAULT_FRAGMENT_SHADER: &str = "shaders/default.frag";

/// Unlit shader used by light gizmo meshes
pub const LIGHT_VERTEX_SHADER: &str = "shaders/light.vert";
pub const LIGHT_FRAGMENT_SHADER: &str = "shaders/light.frag";

/// Skybox shader
pub const CUBEMAP_VERTEX_SHADER: &str = "shaders/cubemap.vert";
pub const CUBEMAP_FRAGMENT_SHADER: &str = "shaders/cubemap.frag";

/// A vertex/fragment shader pair, identified by its source paths
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderProgram {
    pub vertex_path: String,
    pub fragment_path: String,
}

impl ShaderProgram {
    pub fn new(vertex_path: impl Into<String>, fragment_path: impl Into<String>) -> Self {
        Self {
            vertex_path: vertex_path.into(),
            fragment_path: fragment_path.into(),
        }
    }
}

/// Cache of shader programs keyed by their (vertex, fragment) path pair
#[derive(Debug, Default)]
pub struct ShaderCache {
    programs: HashMap<(String, String), Arc<ShaderProgram>>,
}

impl ShaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared program for a path pair, creating it on first use
    pub fn get_or_create(&mut self, vertex_path: &str, fragment_path: &str) -> Arc<ShaderProgram> {
        let key = (vertex_path.to_string(), fragment_path.to_string());
        self.programs
            .entry(key)
            .or_insert_with(|| {
                debug!(vertex_path, fragment_path, "Caching shader program");
                Arc::new(ShaderProgram::new(vertex_path, fragment_path))
            })
            .clone()
    }

    /// Number of distinct programs
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn clear(&mut self) {
        self.programs.clear();
    }
}
