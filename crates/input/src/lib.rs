//! Keyboard state tracking and the fixed-rate control sampler.

pub mod sampler;

pub use sampler::*;

use std::collections::HashSet;

/// Manages keyboard and scroll state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame. Key-repeat events are filtered out by the
    /// held-set check, so one-shot actions trigger once per physical press.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Accumulated scroll lines this frame (positive = up).
    scroll_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once per frame after input is consumed.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.scroll_delta = 0.0;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Accumulate scroll input (line delta).
    pub fn process_scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame (edge-triggered, repeat-free).
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Scroll lines accumulated this frame.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_repeat_does_not_retrigger_pressed() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyL, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::KeyL));

        input.begin_frame();
        // OS key-repeat delivers Pressed again while still held.
        input.process_keyboard(KeyCode::KeyL, ElementState::Pressed);
        assert!(!input.is_key_pressed(KeyCode::KeyL));
        assert!(input.is_key_held(KeyCode::KeyL));
    }

    #[test]
    fn release_and_repress_retriggers() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyC, ElementState::Pressed);
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyC, ElementState::Released);
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyC, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::KeyC));
    }

    #[test]
    fn scroll_accumulates_within_frame() {
        let mut input = InputState::new();
        input.process_scroll(1.0);
        input.process_scroll(2.0);
        assert_eq!(input.scroll_delta(), 3.0);
        input.begin_frame();
        assert_eq!(input.scroll_delta(), 0.0);
    }
}
