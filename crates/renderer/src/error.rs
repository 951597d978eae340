//! Renderer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no GPU adapter compatible with the window surface")]
    NoAdapter,

    /// A dynamic mesh upload changed size; its index buffer no longer matches.
    #[error("vertex upload of {actual} vertices does not match mesh capacity {expected}")]
    VertexCountMismatch { expected: usize, actual: usize },

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
