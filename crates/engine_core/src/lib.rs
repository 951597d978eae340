//! Core engine types shared by the viewer crates:
//! - Scene pose (camera orbit, drag rotation, auto-spin)
//! - Fixed-tick animation clock

pub mod pose;
pub mod time;

pub use pose::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Mat4, Vec2, Vec3, Vec4};
