//! Planar shadow projection.
//!
//! `M = (plane · light) I - light ⊗ plane` maps any homogeneous point onto
//! `plane` along the ray from `light`. The result is a column-major `Mat4`, so
//! `to_cols_array()` yields the classic 16-float OpenGL layout and the matrix
//! composes with the scene transform by left multiplication.

use glam::{Mat4, Vec4};

/// Shadow matrix for a homogeneous `light` (w = 1 point, w = 0 direction) and
/// a plane `(A, B, C, D)` with `Ax + By + Cz + D = 0`.
///
/// When the light lies on the plane (`plane · light == 0`) the matrix is
/// singular. It is returned unchanged and the projected geometry collapses.
pub fn shadow_matrix(light: Vec4, plane: Vec4) -> Mat4 {
    let dot = plane.dot(light);
    if dot == 0.0 {
        log::trace!("Light {:?} lies on shadow plane {:?}", light, plane);
    }
    Mat4::from_diagonal(Vec4::splat(dot))
        - Mat4::from_cols(light * plane.x, light * plane.y, light * plane.z, light * plane.w)
}

/// Light and receiving plane for the shadow pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowProjection {
    pub light: Vec4,
    pub plane: Vec4,
}

impl Default for ShadowProjection {
    /// Point light at (5, 5, 5) over the floor plane z = -9.5.
    fn default() -> Self {
        Self {
            light: Vec4::new(5.0, 5.0, 5.0, 1.0),
            plane: Vec4::new(0.0, 0.0, 1.0, 9.5),
        }
    }
}

impl ShadowProjection {
    pub fn new(light: Vec4, plane: Vec4) -> Self {
        Self { light, plane }
    }

    pub fn dot(&self) -> f32 {
        self.plane.dot(self.light)
    }

    /// True when the light sits on the plane and the projection is singular.
    pub fn is_degenerate(&self) -> bool {
        self.dot() == 0.0
    }

    pub fn is_directional(&self) -> bool {
        self.light.w == 0.0
    }

    pub fn matrix(&self) -> Mat4 {
        shadow_matrix(self.light, self.plane)
    }

    /// Signed plane distance of a homogeneous point, `plane · p`.
    pub fn plane_distance(&self, p: Vec4) -> f32 {
        self.plane.dot(p)
    }
}
