//! Multi-mode chase camera.
//!
//! [`CameraRig`] holds the active [`CameraMode`] and a smoothed
//! [`CameraPose`]. Each tick it computes the mode's target from the vehicle
//! pose and moves a fixed fraction of the way there.

pub mod mode;
pub mod rig;

pub use mode::CameraMode;
pub use rig::{CameraPose, CameraRig, CameraTuning, LOOK_DISTANCE, target_for};
