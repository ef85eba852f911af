//! # Input Manager
//!
//! Tracks which keys are down and how far the mouse moved, and turns that into a
//! [`ProcessedInputState`] once per frame. Events come from whatever drives the engine:
//! a windowing layer, or the scripted fly-through of the headless application.

use std::collections::HashMap;

use winit::keyboard::KeyCode;

use super::input_state::{ProcessedInputState, RawInputState};

/// Keys the camera reacts to.
pub const KEY_CODES: [KeyCode; 7] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::Space,
    KeyCode::ShiftLeft,
    KeyCode::Escape,
];

/// Manages the state of all input devices.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    keyboard_inputs_new: HashMap<KeyCode, bool>,
    /// Mouse movement accumulated since the last snapshot
    mouse_delta: Option<(f64, f64)>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with every tracked key released.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<KeyCode, bool> =
            KEY_CODES.iter().map(|key| (*key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_delta: None,
        }
    }

    /// Records a key going down or up. Untracked keys are ignored.
    pub fn intake_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
        }
    }

    /// Adds to the mouse movement delta of the current frame.
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (x, y) = self.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    /// Creates a processed input state from the current raw boolean states.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_delta: self.mouse_delta,
        }
    }

    /// Returns the processed input state and prepares for the next frame.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.reset_inputs();
        processed_input
    }

    /// Moves the current key states into the previous ones and clears mouse motion.
    pub fn reset_inputs(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }
        self.mouse_delta = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_transitions_across_frames() {
        let mut input = InputManager::new();
        input.intake_key(KeyCode::KeyW, true);
        input.intake_key(KeyCode::KeyQ, true);
        let first = input.get_and_reset_processed_input();
        assert_eq!(first.get_key_state(KeyCode::KeyW), RawInputState::Pressed);
        assert!(!first.keyboard_states.contains_key(&KeyCode::KeyQ));

        let second = input.get_and_reset_processed_input();
        assert_eq!(second.get_key_state(KeyCode::KeyW), RawInputState::Held);

        input.intake_key(KeyCode::KeyW, false);
        let third = input.get_and_reset_processed_input();
        assert_eq!(third.get_key_state(KeyCode::KeyW), RawInputState::Released);
    }

    #[test]
    fn mouse_motion_accumulates_until_reset() {
        let mut input = InputManager::new();
        input.intake_mouse_motion((1.0, 2.0));
        input.intake_mouse_motion((0.5, -1.0));
        assert_eq!(input.get_and_reset_processed_input().mouse_delta, Some((1.5, 1.0)));
        assert_eq!(input.get_and_reset_processed_input().mouse_delta, None);
    }
}
