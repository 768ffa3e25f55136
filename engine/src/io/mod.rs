//! Input/Output module for model loading and scene serialization

pub mod components;
mod entity_mapper;
pub mod model;
mod scene;

pub use entity_mapper::EntityMapper;
pub use model::{ModelData, ModelLoader, SubMesh, UnitCubeModelLoader};
pub use scene::{SceneDocument, SceneError, SceneSerializer};
