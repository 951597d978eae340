//! Errors raised while building surface geometry.

use thiserror::Error;

/// Invalid inputs to the surface generator. These are caller bugs: nothing here
/// is recoverable by retrying.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    /// Fewer than 3 azimuth steps or no radial step at all.
    #[error("invalid tessellation resolution {u_steps}x{v_steps} (need u_steps >= 3, v_steps >= 1)")]
    InvalidResolution { u_steps: u32, v_steps: u32 },

    /// Cap half-angle outside the open interval (0, π).
    #[error("cap half-angle {0} rad is outside (0, pi)")]
    InvalidCapAngle(f32),

    /// Inner ring factor outside [0, 1].
    #[error("inner radius factor {0} is outside [0, 1]")]
    InvalidInnerRadiusFactor(f32),

    #[error("concave depth {0} is not finite")]
    NonFiniteDepth(f32),
}
