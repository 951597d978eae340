//! Input handling for keyboard and mouse.

use glam::Vec2;
use std::collections::{HashMap, HashSet};

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Press events per key this frame (auto-repeats included).
    keys_pressed: HashMap<KeyCode, u32>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,
    /// Mouse buttons released this frame.
    mouse_released: HashSet<MouseButton>,
    /// Frame cursor delta at the moment each button went down this frame.
    delta_at_press: HashMap<MouseButton, Vec2>,

    /// Cursor position in window pixels, once known.
    cursor_position: Option<Vec2>,
    /// Cursor movement since the last `begin_frame`, in window pixels.
    cursor_delta: Vec2,

    /// Scroll lines accumulated this frame (positive = away from the user).
    scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once per frame after consuming input.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.delta_at_press.clear();
        self.cursor_delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    /// Process a keyboard event. Auto-repeat presses count as fresh presses,
    /// so a held arrow key keeps orbiting.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                if repeat || !self.keys_held.contains(&key) {
                    *self.keys_pressed.entry(key).or_insert(0) += 1;
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                    self.delta_at_press.insert(button, self.cursor_delta);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
                self.mouse_released.insert(button);
            }
        }
    }

    /// Process a cursor position update. The first position only seeds the
    /// tracker; later ones accumulate into the frame delta.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        let position = Vec2::new(position.0 as f32, position.1 as f32);
        if let Some(last) = self.cursor_position {
            self.cursor_delta += position - last;
        }
        self.cursor_position = Some(position);
    }

    /// Cursor left the window: the next entry must not produce a jump.
    pub fn process_cursor_left(&mut self) {
        self.cursor_position = None;
    }

    /// Process a scroll in lines.
    pub fn process_scroll(&mut self, lines: f32) {
        self.scroll += lines;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.key_press_count(key) > 0
    }

    /// Number of press events for a key this frame.
    pub fn key_press_count(&self, key: KeyCode) -> u32 {
        self.keys_pressed.get(&key).copied().unwrap_or(0)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Check if a mouse button was released this frame.
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }

    pub fn cursor_position(&self) -> Option<Vec2> {
        self.cursor_position
    }

    /// Cursor movement this frame in window pixels.
    pub fn cursor_delta(&self) -> Vec2 {
        self.cursor_delta
    }

    /// Cursor movement this frame that happened after `button` went down.
    /// Equals `cursor_delta` when the button was not pressed this frame.
    pub fn cursor_delta_since_press(&self, button: MouseButton) -> Vec2 {
        self.cursor_delta - self.delta_at_press.get(&button).copied().unwrap_or(Vec2::ZERO)
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Arrow-key orbit steps this frame, one per press event:
    /// x = yaw (right +), y = pitch (up +).
    pub fn orbit_input(&self) -> Vec2 {
        let steps = |plus: KeyCode, minus: KeyCode| {
            self.key_press_count(plus) as f32 - self.key_press_count(minus) as f32
        };
        Vec2::new(
            steps(KeyCode::ArrowRight, KeyCode::ArrowLeft),
            steps(KeyCode::ArrowUp, KeyCode::ArrowDown),
        )
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_is_one_frame() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyT, ElementState::Pressed, false);
        assert!(input.is_key_pressed(KeyCode::KeyT));
        assert!(input.is_key_held(KeyCode::KeyT));
        input.begin_frame();
        assert!(!input.is_key_pressed(KeyCode::KeyT));
        assert!(input.is_key_held(KeyCode::KeyT));
    }

    #[test]
    fn repeat_counts_as_press() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::ArrowUp, ElementState::Pressed, false);
        input.begin_frame();
        input.process_keyboard(KeyCode::ArrowUp, ElementState::Pressed, true);
        assert_eq!(input.orbit_input(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn presses_in_one_frame_are_counted() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::ArrowRight, ElementState::Pressed, false);
        input.process_keyboard(KeyCode::ArrowRight, ElementState::Pressed, true);
        input.process_keyboard(KeyCode::ArrowRight, ElementState::Pressed, true);
        input.process_keyboard(KeyCode::ArrowLeft, ElementState::Pressed, false);
        assert_eq!(input.key_press_count(KeyCode::ArrowRight), 3);
        assert_eq!(input.orbit_input(), Vec2::new(2.0, 0.0));

        input.process_keyboard(KeyCode::KeyT, ElementState::Pressed, false);
        input.process_keyboard(KeyCode::KeyT, ElementState::Released, false);
        input.process_keyboard(KeyCode::KeyT, ElementState::Pressed, false);
        assert_eq!(input.key_press_count(KeyCode::KeyT), 2);

        input.begin_frame();
        assert_eq!(input.key_press_count(KeyCode::KeyT), 0);
    }

    #[test]
    fn cursor_delta_accumulates_from_positions() {
        let mut input = InputState::new();
        input.process_cursor_position((100.0, 100.0));
        assert_eq!(input.cursor_delta(), Vec2::ZERO);
        input.process_cursor_position((110.0, 95.0));
        input.process_cursor_position((115.0, 90.0));
        assert_eq!(input.cursor_delta(), Vec2::new(15.0, -10.0));
        input.begin_frame();
        assert_eq!(input.cursor_delta(), Vec2::ZERO);
    }

    #[test]
    fn cursor_reentry_does_not_jump() {
        let mut input = InputState::new();
        input.process_cursor_position((10.0, 10.0));
        input.process_cursor_left();
        input.process_cursor_position((500.0, 500.0));
        assert_eq!(input.cursor_delta(), Vec2::ZERO);
    }

    #[test]
    fn motion_before_press_is_excluded() {
        let mut input = InputState::new();
        input.process_cursor_position((0.0, 0.0));
        input.process_cursor_position((30.0, 0.0));
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.process_cursor_position((30.0, 4.0));
        assert_eq!(input.cursor_delta(), Vec2::new(30.0, 4.0));
        assert_eq!(input.cursor_delta_since_press(MouseButton::Left), Vec2::new(0.0, 4.0));

        input.begin_frame();
        input.process_cursor_position((40.0, 4.0));
        assert_eq!(input.cursor_delta_since_press(MouseButton::Left), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn mouse_release_is_reported() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_mouse_pressed(MouseButton::Left));
        input.begin_frame();
        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(input.is_mouse_released(MouseButton::Left));
        assert!(!input.is_mouse_held(MouseButton::Left));
    }
}
