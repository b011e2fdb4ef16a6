//! Vehicle-tracking camera rig with per-tick smoothing.

use glam::{Mat3, Quat, Vec3};
use pitlane_vehicle::VehicleState;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mode::CameraMode;

/// Distance from the eye to the point returned by [`CameraPose::look_at_point`].
pub const LOOK_DISTANCE: f32 = 10.0;

/// Camera section of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub initial_mode: CameraMode,
    pub follow_distance: f32,
    pub follow_height: f32,
    pub front_distance: f32,
    pub front_height: f32,
    pub overhead_height: f32,
    pub side_distance: f32,
    pub side_height: f32,
    /// Eye offset in the vehicle frame, before rotation by heading.
    pub cockpit_offset: [f32; 3],
    /// How far ahead of the cockpit eye to look.
    pub cockpit_look_ahead: f32,
    /// Fraction of the remaining eye distance covered per tick.
    pub position_blend: f32,
    /// Fraction of the remaining look-direction change covered per tick.
    pub direction_blend: f32,
    pub initial_eye: [f32; 3],
    pub initial_direction: [f32; 3],
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            initial_mode: CameraMode::Follow,
            follow_distance: 8.0,
            follow_height: 4.0,
            front_distance: 6.0,
            front_height: 2.0,
            overhead_height: 15.0,
            side_distance: 10.0,
            side_height: 3.0,
            cockpit_offset: [0.0, 1.0, 1.0],
            cockpit_look_ahead: 10.0,
            position_blend: 0.1,
            direction_blend: 0.1,
            initial_eye: [0.0, 6.0, 10.0],
            initial_direction: [0.0, 0.0, -1.0],
        }
    }
}

/// Where the camera is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub eye: Vec3,
    /// Unit look direction.
    pub direction: Vec3,
}

impl CameraPose {
    pub fn look_at_point(&self) -> Vec3 {
        self.eye + self.direction * LOOK_DISTANCE
    }

    /// Orientation of a camera looking down its local -Z with +Y up.
    pub fn rotation(&self) -> Quat {
        let back = -self.direction;
        let right = Vec3::Y.cross(back).normalize_or_zero();
        if right == Vec3::ZERO {
            // Looking straight up or down: any yaw will do.
            return Quat::from_rotation_arc(Vec3::NEG_Z, self.direction);
        }
        let up = back.cross(right);
        Quat::from_mat3(&Mat3::from_cols(right, up, back))
    }
}

/// Desired eye and look-at point for a mode, before smoothing.
pub fn target_for(mode: CameraMode, vehicle: &VehicleState, tuning: &CameraTuning) -> (Vec3, Vec3) {
    let p = vehicle.position;
    let f = vehicle.forward();
    match mode {
        CameraMode::Follow => (
            p - f * tuning.follow_distance + Vec3::Y * tuning.follow_height,
            p,
        ),
        CameraMode::Front => (
            p + f * tuning.front_distance + Vec3::Y * tuning.front_height,
            p,
        ),
        CameraMode::Overhead => (p + Vec3::Y * tuning.overhead_height, p),
        CameraMode::Side => (
            p + vehicle.side() * tuning.side_distance + Vec3::Y * tuning.side_height,
            p,
        ),
        CameraMode::Cockpit => {
            let eye = p + vehicle.orientation() * Vec3::from(tuning.cockpit_offset);
            (eye, eye + f * tuning.cockpit_look_ahead)
        }
    }
}

/// Mode selector plus the smoothed camera pose.
#[derive(Debug, Clone)]
pub struct CameraRig {
    mode: CameraMode,
    pose: CameraPose,
    tuning: CameraTuning,
    pending_cycle: bool,
}

impl CameraRig {
    pub fn new(tuning: CameraTuning) -> Self {
        let direction = Vec3::from(tuning.initial_direction)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z);
        Self {
            mode: tuning.initial_mode,
            pose: CameraPose {
                eye: Vec3::from(tuning.initial_eye),
                direction,
            },
            tuning,
            pending_cycle: false,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn tuning(&self) -> &CameraTuning {
        &self.tuning
    }

    /// Advance to the next mode immediately.
    pub fn cycle(&mut self) -> CameraMode {
        let previous = self.mode;
        self.mode = self.mode.next();
        debug!("Camera mode: {} -> {}", previous, self.mode);
        self.mode
    }

    /// Queue a cycle for the next [`update`](Self::update). Several requests
    /// between two updates still advance one step each.
    pub fn request_cycle(&mut self) {
        if self.pending_cycle {
            self.cycle();
        }
        self.pending_cycle = true;
    }

    /// Desired eye and look-at point for the current mode.
    pub fn target(&self, vehicle: &VehicleState) -> (Vec3, Vec3) {
        target_for(self.mode, vehicle, &self.tuning)
    }

    /// Move one smoothing step toward the current mode's target. Without a
    /// vehicle the pose is held.
    pub fn update(&mut self, vehicle: Option<&VehicleState>) -> CameraPose {
        if std::mem::take(&mut self.pending_cycle) {
            self.cycle();
        }
        let Some(vehicle) = vehicle else {
            return self.pose;
        };

        let (target_eye, look_at) = self.target(vehicle);
        let eye = self.pose.eye.lerp(target_eye, self.tuning.position_blend);

        // Both directions are measured from the already-moved eye.
        let direction = match (look_at - eye).try_normalize() {
            Some(target_dir) => self
                .pose
                .direction
                .lerp(target_dir, self.tuning.direction_blend)
                .try_normalize()
                .unwrap_or(self.pose.direction),
            None => self.pose.direction,
        };

        self.pose = CameraPose { eye, direction };
        self.pose
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraTuning::default())
    }
}
