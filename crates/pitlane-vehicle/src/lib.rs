//! Arcade vehicle model.
//!
//! The vehicle is a point with a heading and a signed scalar speed. Each tick
//! [`step_vehicle`] turns held controls and the latest ground sample into the
//! next [`VehicleState`]. There is no mass or tire model; friction, boost and
//! off-track penalties are plain multipliers from [`VehicleTuning`].

pub mod catalog;
pub mod integrator;
pub mod state;
pub mod tuning;

pub use catalog::{VehicleCatalog, VehicleSpec};
pub use integrator::step_vehicle;
pub use state::{VehicleState, heading_forward};
pub use tuning::{Limits, VehicleTuning};
