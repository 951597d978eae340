//! Procedural geometry for the speaker solid: surface patches, strip
//! tessellation, planar shadow projection, and the checkerboard texture.

pub mod error;
pub mod shadow;
pub mod surface;
pub mod tessellate;
pub mod textures;

pub use error::*;
pub use shadow::*;
pub use surface::*;
pub use tessellate::*;
pub use textures::*;
