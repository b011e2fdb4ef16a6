//! Drive session runtime.
//!
//! A [`DriveSession`] owns a `bevy_ecs` world holding the vehicle, the track,
//! the ground probe and the camera rig. Each [`DriveSession::tick`] runs four
//! chained systems on a single-threaded schedule: integrate the vehicle with
//! last tick's ground sample, probe the ground at the new position, move the
//! camera, then notify observers.

pub mod clock;
pub mod resources;
pub mod session;
pub mod systems;

pub use clock::FrameClock;
pub use resources::{ObserverId, Observers};
pub use session::{DriveSession, HudSnapshot, control_map_from_config};
pub use systems::build_tick_schedule;
