//! Vehicle pose and motion state.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::tuning::VehicleTuning;

/// Snapshot of the vehicle for one tick. Replaced wholesale by the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub position: Vec3,
    /// Heading in radians, measured from +Z.
    pub rotation: f32,
    /// Signed speed along the heading, forward positive.
    pub velocity: f32,
    /// Signed turn rate in radians per tick.
    pub angular_velocity: f32,
    pub is_on_track: bool,
    /// Accumulated wheel spin, for renderers.
    pub wheel_angle: f32,
}

impl VehicleState {
    /// Spawn pose from `tuning`, at rest and on track.
    pub fn spawn(tuning: &VehicleTuning) -> Self {
        Self {
            position: Vec3::from(tuning.spawn_position),
            rotation: tuning.spawn_heading,
            velocity: 0.0,
            angular_velocity: 0.0,
            is_on_track: true,
            wheel_angle: 0.0,
        }
    }

    /// Unit heading in the XZ plane.
    pub fn forward(&self) -> Vec3 {
        heading_forward(self.rotation)
    }

    /// Unit vector perpendicular to the heading, in the XZ plane.
    pub fn side(&self) -> Vec3 {
        let (sin, cos) = self.rotation.sin_cos();
        Vec3::new(cos, 0.0, -sin)
    }

    /// Orientation for renderers: a yaw about +Y.
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.rotation)
    }

    /// HUD speed read-out.
    pub fn speed_kmh(&self) -> f32 {
        self.velocity.abs() * 100.0
    }

    /// HUD surface label.
    pub fn track_label(&self) -> &'static str {
        if self.is_on_track {
            "On Track"
        } else {
            "Off Track"
        }
    }

    /// One-line HUD text, e.g. `"12.5 km/h | On Track"`.
    pub fn hud_line(&self) -> String {
        format!("{:.1} km/h | {}", self.speed_kmh(), self.track_label())
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::spawn(&VehicleTuning::default())
    }
}

/// `(sin r, 0, cos r)`.
pub fn heading_forward(rotation: f32) -> Vec3 {
    let (sin, cos) = rotation.sin_cos();
    Vec3::new(sin, 0.0, cos)
}
