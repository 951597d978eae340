//! Scene pose: camera orbit, drag rotation, and auto-spin.
//!
//! All angles are stored in degrees. The camera orbits the origin with +Z up;
//! its eye position is derived on demand and never cached.

use glam::{Mat4, Vec3};

/// Pitch limit; keeps the eye off the poles where the +Z up vector degenerates.
pub const MAX_PITCH_DEGREES: f32 = 89.0;
/// Solid rotation per pixel of pointer drag.
pub const DRAG_DEGREES_PER_PIXEL: f32 = 0.5;
/// 0.5° every 16 ms tick.
pub const DEFAULT_SPIN_RATE: f32 = 0.5 / 0.016;

pub const MIN_CAMERA_DISTANCE: f32 = 3.0;
pub const MAX_CAMERA_DISTANCE: f32 = 40.0;

/// Camera orbit plus solid rotation, mutated by input and timer events.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    camera_yaw: f32,
    camera_pitch: f32,
    camera_distance: f32,
    drag_rotation_x: f32,
    drag_rotation_y: f32,
    auto_spin: f32,
    /// Auto-spin speed in degrees per second.
    spin_rate: f32,
    dragging: bool,
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(0.0, 30.0, 12.0)
    }
}

impl Pose {
    /// Start pose from camera yaw/pitch (degrees) and distance.
    pub fn new(yaw: f32, pitch: f32, distance: f32) -> Self {
        Self {
            camera_yaw: yaw.rem_euclid(360.0),
            camera_pitch: pitch.clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES),
            camera_distance: distance.clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE),
            drag_rotation_x: 0.0,
            drag_rotation_y: 0.0,
            auto_spin: 0.0,
            spin_rate: DEFAULT_SPIN_RATE,
            dragging: false,
        }
    }

    pub fn with_spin_rate(mut self, degrees_per_second: f32) -> Self {
        self.spin_rate = degrees_per_second;
        self
    }

    pub fn camera_yaw(&self) -> f32 {
        self.camera_yaw
    }

    pub fn camera_pitch(&self) -> f32 {
        self.camera_pitch
    }

    pub fn camera_distance(&self) -> f32 {
        self.camera_distance
    }

    pub fn drag_rotation(&self) -> (f32, f32) {
        (self.drag_rotation_x, self.drag_rotation_y)
    }

    pub fn auto_spin(&self) -> f32 {
        self.auto_spin
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Orbit the camera. Pitch saturates at ±89°.
    pub fn apply_orbit_delta(&mut self, d_yaw: f32, d_pitch: f32) {
        self.camera_yaw = (self.camera_yaw + d_yaw).rem_euclid(360.0);
        self.camera_pitch = (self.camera_pitch + d_pitch).clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
    }

    /// Scale the orbit distance; positive `delta` moves closer.
    pub fn apply_zoom(&mut self, delta: f32) {
        let factor = 0.9_f32.powf(delta);
        self.camera_distance = (self.camera_distance * factor).clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Rotate the solid by a pointer movement in pixels. Vertical motion turns
    /// it about X, horizontal motion about Y. No-op outside a drag.
    pub fn apply_drag_delta(&mut self, dx: f32, dy: f32) {
        if !self.dragging {
            return;
        }
        self.drag_rotation_x += dy * DRAG_DEGREES_PER_PIXEL;
        self.drag_rotation_y += dx * DRAG_DEGREES_PER_PIXEL;
    }

    /// Advance the spin by `dt` seconds. Paused while a drag is active.
    pub fn tick_auto_spin(&mut self, dt: f32) {
        if self.dragging {
            return;
        }
        self.auto_spin = (self.auto_spin + self.spin_rate * dt).rem_euclid(360.0);
    }

    /// Camera eye on the orbit sphere.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.camera_yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.camera_pitch.to_radians().sin_cos();
        self.camera_distance * Vec3::new(cos_yaw * cos_pitch, sin_yaw * cos_pitch, sin_pitch)
    }

    /// Look-at view matrix: eye on the orbit, target at the origin, +Z up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Z)
    }

    /// Drag rotation about X, then Y, then the spin about the solid's own Z axis.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.drag_rotation_x.to_radians())
            * Mat4::from_rotation_y(self.drag_rotation_y.to_radians())
            * Mat4::from_rotation_z(self.auto_spin.to_radians())
    }
}
