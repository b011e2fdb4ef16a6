//! Physical-key press tracker.
//!
//! [`KeyboardState`] folds winit key events into the set of keys currently
//! held. Physical key codes are used so that WASD driving works identically
//! regardless of the user's keyboard layout.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Minimal description of a key event for processing.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    /// The physical key involved.
    pub key: PhysicalKey,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether this is an OS auto-repeat event.
    pub repeat: bool,
}

impl RawKeyEvent {
    /// A non-repeat press of `key`.
    #[must_use]
    pub fn press(key: PhysicalKey) -> Self {
        Self {
            key,
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    /// A release of `key`.
    #[must_use]
    pub fn release(key: PhysicalKey) -> Self {
        Self {
            key,
            state: ElementState::Released,
            repeat: false,
        }
    }

    /// An auto-repeat press of `key`, as sent while the key stays down.
    #[must_use]
    pub fn repeat(key: PhysicalKey) -> Self {
        Self {
            key,
            state: ElementState::Pressed,
            repeat: true,
        }
    }
}

impl From<&KeyEvent> for RawKeyEvent {
    fn from(event: &KeyEvent) -> Self {
        Self {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        }
    }
}

/// What a processed event did to the held set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    /// The key went from up to down.
    Pressed,
    /// The key went from down to up.
    Released,
    /// Repeat event, or a press/release that matched the current state.
    Unchanged,
}

/// Tracks which physical keys are currently held.
///
/// Repeat events never change state, and a second press of a key that is
/// already down is reported as [`KeyTransition::Unchanged`]. Callers build
/// edge detection on top of the returned transition.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<PhysicalKey>,
}

impl KeyboardState {
    /// Creates a new `KeyboardState` with no keys pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a [`RawKeyEvent`] (platform-independent, test-friendly).
    pub fn process_raw(&mut self, event: RawKeyEvent) -> KeyTransition {
        if event.repeat {
            return KeyTransition::Unchanged;
        }
        match event.state {
            ElementState::Pressed => {
                if self.pressed.insert(event.key) {
                    KeyTransition::Pressed
                } else {
                    KeyTransition::Unchanged
                }
            }
            ElementState::Released => {
                if self.pressed.remove(&event.key) {
                    KeyTransition::Released
                } else {
                    KeyTransition::Unchanged
                }
            }
        }
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed.contains(&key)
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.pressed.len()
    }

    /// Forget every held key, e.g. when focus is lost or the listener detaches.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    fn key(code: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(code)
    }

    #[test]
    fn test_initial_state_no_keys_pressed() {
        let kb = KeyboardState::new();
        for code in [KeyCode::KeyW, KeyCode::KeyA, KeyCode::Space, KeyCode::KeyC] {
            assert!(!kb.is_pressed(key(code)));
        }
        assert_eq!(kb.held_count(), 0);
    }

    #[test]
    fn test_press_then_release() {
        let mut kb = KeyboardState::new();
        assert_eq!(
            kb.process_raw(RawKeyEvent::press(key(KeyCode::KeyW))),
            KeyTransition::Pressed
        );
        assert!(kb.is_pressed(key(KeyCode::KeyW)));
        assert_eq!(
            kb.process_raw(RawKeyEvent::release(key(KeyCode::KeyW))),
            KeyTransition::Released
        );
        assert!(!kb.is_pressed(key(KeyCode::KeyW)));
    }

    #[test]
    fn test_repeat_events_do_not_transition() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(key(KeyCode::KeyC)));
        for _ in 0..5 {
            assert_eq!(
                kb.process_raw(RawKeyEvent::repeat(key(KeyCode::KeyC))),
                KeyTransition::Unchanged
            );
        }
        assert!(kb.is_pressed(key(KeyCode::KeyC)));
    }

    #[test]
    fn test_duplicate_press_is_unchanged() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(key(KeyCode::KeyA)));
        assert_eq!(
            kb.process_raw(RawKeyEvent::press(key(KeyCode::KeyA))),
            KeyTransition::Unchanged
        );
    }

    #[test]
    fn test_release_of_unheld_key_is_unchanged() {
        let mut kb = KeyboardState::new();
        assert_eq!(
            kb.process_raw(RawKeyEvent::release(key(KeyCode::KeyS))),
            KeyTransition::Unchanged
        );
    }

    #[test]
    fn test_multiple_keys_tracked_independently() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(key(KeyCode::KeyW)));
        kb.process_raw(RawKeyEvent::press(key(KeyCode::KeyD)));
        kb.process_raw(RawKeyEvent::release(key(KeyCode::KeyW)));
        assert!(!kb.is_pressed(key(KeyCode::KeyW)));
        assert!(kb.is_pressed(key(KeyCode::KeyD)));
        assert_eq!(kb.held_count(), 1);
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(key(KeyCode::KeyW)));
        kb.process_raw(RawKeyEvent::press(key(KeyCode::Space)));
        kb.clear();
        assert_eq!(kb.held_count(), 0);
    }
}
