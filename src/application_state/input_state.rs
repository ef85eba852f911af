//! # Input State
//!
//! This module defines the input state types used by the input manager.
//! It provides enums and structs for representing the state of input devices.

use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Represents the state of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key is not pressed
    #[default]
    NotPressed,
    /// Key was just pressed this frame
    Pressed,
    /// Key has been held down for multiple frames
    Held,
    /// Key was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Derives the transition from the previous and current down states
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// A snapshot of the processed input states with state transitions.
#[derive(Debug, Clone, Default)]
pub struct ProcessedInputState {
    /// Current state of all tracked keyboard keys
    pub keyboard_states: HashMap<KeyCode, RawInputState>,

    /// Mouse movement delta since the last frame (x, y)
    pub mouse_delta: Option<(f64, f64)>,
}

impl ProcessedInputState {
    /// A snapshot where every key in `held` is down and everything else is up.
    ///
    /// Useful for scripted input and tests, where there is no previous frame.
    pub fn from_held(held: &[KeyCode], mouse_delta: Option<(f64, f64)>) -> Self {
        ProcessedInputState {
            keyboard_states: held.iter().map(|key| (*key, RawInputState::Held)).collect(),
            mouse_delta,
        }
    }

    /// Gets the state of a keyboard key
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// Whether a key is currently down
    pub fn is_key_active(&self, key: KeyCode) -> bool {
        self.get_key_state(key).is_active()
    }

    /// Gets the mouse movement delta since the last frame
    pub fn get_mouse_delta(&self) -> Option<(f64, f64)> {
        self.mouse_delta
    }
}
