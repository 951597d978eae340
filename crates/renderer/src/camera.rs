//! Perspective camera and the uniform blocks shared with the scene shader.

use bytemuck::{Pod, Zeroable};
use engine_core::Pose;
use glam::{Mat4, Vec3, Vec4};

/// Perspective projection; the eye itself comes from the scene `Pose`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 1.0,
            far: 100.0,
            aspect: 800.0 / 600.0,
        }
    }
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self::default();
        camera.set_aspect(width, height);
        camera
    }

    /// Update aspect ratio (call on window resize). A zero-sized window
    /// (minimized) keeps the previous aspect.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self, pose: &Pose) -> Mat4 {
        self.projection_matrix() * pose.view_matrix()
    }
}

/// Per-frame scene uniform (must match scene.wgsl `Scene`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = eye, w unused
    pub eye: [f32; 4],
    /// Homogeneous light position; w = 0 is a directional light.
    pub light: [f32; 4],
}

impl SceneUniform {
    pub fn new(view_proj: Mat4, eye: Vec3, light: Vec4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
            light: light.to_array(),
        }
    }
}

impl Default for SceneUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Vec3::ZERO, Vec4::Z)
    }
}

/// Per-draw uniform (must match scene.wgsl `Draw`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x = lighting on, y = texture on; zw unused
    pub flags: [f32; 4],
}

impl DrawUniform {
    pub fn new(model: Mat4, color: [f32; 4], lighting: bool, textured: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            flags: [flag(lighting), flag(textured), 0.0, 0.0],
        }
    }

    pub fn lighting(&self) -> bool {
        self.flags[0] > 0.5
    }

    pub fn textured(&self) -> bool {
        self.flags[1] > 0.5
    }
}

impl Default for DrawUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, [1.0; 4], true, false)
    }
}

fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}
