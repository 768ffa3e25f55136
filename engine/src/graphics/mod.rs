//! Graphics module
//!
//! Mesh and material components plus the interfaces the scene uses to talk to
//! a render backend and its framebuffer.

pub mod material;
pub mod mesh;
pub mod render_target;
pub mod renderer;
pub mod uniform;

// Re-export commonly used types
pub use material::{Material, MaterialUniform};
pub use mesh::{Aabb, MeshComponent, MeshRendererComponent, TextureSpecification};
pub use render_target::{FrameBuffer, ENTITY_ID_ATTACHMENT, NO_ENTITY};
pub use renderer::{DrawItem, RecordingBackend, RenderBackend, ViewSpecification};
pub use uniform::{CameraUniform, LightUniform, ObjectUniform};
