//! wgpu renderer for the speaker viewer: strip batching, textures, the scene
//! pipelines, and a single-pass frame.

pub mod camera;
pub mod error;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use camera::*;
pub use error::*;
pub use mesh::*;
pub use pipeline::*;
pub use renderer::*;
pub use texture::*;
pub use vertex::*;
