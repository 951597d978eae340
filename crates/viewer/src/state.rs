//! Scene state mutated by input and the animation tick: the pose plus the
//! render toggles.

use engine_core::Pose;
use input::{InputState, KeyCode, MouseButton};
use renderer::Shading;

pub const TEXTURE_KEY: KeyCode = KeyCode::KeyT;
pub const SHADING_KEY: KeyCode = KeyCode::KeyS;
pub const DEPTH_KEY: KeyCode = KeyCode::KeyD;
pub const QUIT_KEY: KeyCode = KeyCode::Escape;

/// Render switches flipped from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    pub texture: bool,
    pub shading: Shading,
    pub depth_test: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            texture: true,
            shading: Shading::Smooth,
            depth_test: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneState {
    pub pose: Pose,
    pub toggles: Toggles,
    /// Degrees per arrow-key press.
    pub orbit_step: f32,
    pub running: bool,
}

impl SceneState {
    pub fn new(pose: Pose, orbit_step: f32) -> Self {
        Self {
            pose,
            toggles: Toggles::default(),
            orbit_step,
            running: true,
        }
    }

    /// Apply one frame of input: toggles, quit, orbit, drag, and zoom.
    pub fn apply_input(&mut self, input: &InputState) {
        if input.is_key_pressed(QUIT_KEY) {
            self.running = false;
        }
        // Each press flips once, so an even count within a frame cancels out.
        for _ in 0..input.key_press_count(TEXTURE_KEY) {
            self.toggles.texture = !self.toggles.texture;
            log::info!("Texture {}", on_off(self.toggles.texture));
        }
        for _ in 0..input.key_press_count(SHADING_KEY) {
            self.toggles.shading = self.toggles.shading.toggled();
            log::info!("Shading {:?}", self.toggles.shading);
        }
        for _ in 0..input.key_press_count(DEPTH_KEY) {
            self.toggles.depth_test = !self.toggles.depth_test;
            log::info!("Depth test {}", on_off(self.toggles.depth_test));
        }

        let orbit = input.orbit_input();
        if orbit != glam::Vec2::ZERO {
            self.pose.apply_orbit_delta(orbit.x * self.orbit_step, orbit.y * self.orbit_step);
        }

        if input.is_mouse_pressed(MouseButton::Left) {
            self.pose.begin_drag();
        }
        let delta = input.cursor_delta_since_press(MouseButton::Left);
        if delta != glam::Vec2::ZERO {
            self.pose.apply_drag_delta(delta.x, delta.y);
        }
        if input.is_mouse_released(MouseButton::Left) {
            self.pose.end_drag();
        }

        if input.scroll() != 0.0 {
            self.pose.apply_zoom(input.scroll());
        }
    }

    /// Run `ticks` fixed animation ticks of `tick_seconds` each.
    pub fn advance(&mut self, ticks: u32, tick_seconds: f32) {
        for _ in 0..ticks {
            self.pose.tick_auto_spin(tick_seconds);
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
