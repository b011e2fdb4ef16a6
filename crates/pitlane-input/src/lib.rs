//! Keyboard input for driving: physical key tracking, control bindings, and a
//! session-scoped sampler that produces one snapshot per simulation tick.

pub mod controls;
pub mod keyboard;
pub mod sampler;

pub use controls::{Conflict, Control, ControlMap, ControlsError, KeyBinding, key_from_name};
pub use keyboard::{KeyTransition, KeyboardState, RawKeyEvent};
pub use sampler::{InputSampler, InputSnapshot, InputState, KeyDisposition};
