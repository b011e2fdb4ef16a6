//! Vehicle tuning constants.

use serde::{Deserialize, Serialize};

/// Max speed factor while off the track.
pub const OFF_TRACK_SPEED_FACTOR: f32 = 0.7;
/// Acceleration factor while off the track.
pub const OFF_TRACK_ACCEL_FACTOR: f32 = 0.8;
/// Steering factor while off the track.
pub const OFF_TRACK_TURN_FACTOR: f32 = 0.7;
/// Acceleration multiplier while boosting.
pub const BOOST_ACCEL_FACTOR: f32 = 1.5;
/// Reverse speed limit as a fraction of the current max speed.
pub const REVERSE_SPEED_FACTOR: f32 = 0.6;
/// Below this speed the vehicle cannot turn.
pub const MIN_STEER_SPEED: f32 = 0.01;
/// Angular velocity retained per tick when no steering key is held.
pub const STEER_DECAY: f32 = 0.9;
/// Velocity retained per tick while the handbrake is held.
pub const HANDBRAKE_VELOCITY_FACTOR: f32 = 0.95;
/// Angular velocity retained per tick while the handbrake is held.
pub const HANDBRAKE_TURN_FACTOR: f32 = 0.8;
/// Wheel spin per unit of velocity, in radians.
pub const WHEEL_SPIN_FACTOR: f32 = 0.5;

/// Per-tick physics parameters. All speeds are world units per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Radians per tick at full speed.
    pub turn_speed: f32,
    pub boost_multiplier: f32,
    /// Fall distance per tick while above the ground target.
    pub gravity: f32,
    pub ground_friction: f32,
    pub off_track_friction: f32,
    pub spawn_position: [f32; 3],
    /// Heading in radians, measured from +Z.
    pub spawn_heading: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: 0.15,
            acceleration: 0.005,
            deceleration: 0.004,
            turn_speed: 0.04,
            boost_multiplier: 2.0,
            gravity: 0.01,
            ground_friction: 0.95,
            off_track_friction: 0.8,
            spawn_position: [0.0, 0.5, 15.0],
            spawn_heading: 0.0,
        }
    }
}

/// Speed and acceleration limits for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub max_speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    pub turn_factor: f32,
}

impl VehicleTuning {
    /// First parameter the integrator cannot run with, as `(name, value)`.
    ///
    /// Every parameter must be finite, `max_speed` and `boost_multiplier`
    /// positive, and both frictions within `[0, 1]`.
    #[must_use]
    pub fn invalid_parameter(&self) -> Option<(&'static str, f32)> {
        let [x, y, z] = self.spawn_position;
        let values = [
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("turn_speed", self.turn_speed),
            ("boost_multiplier", self.boost_multiplier),
            ("gravity", self.gravity),
            ("ground_friction", self.ground_friction),
            ("off_track_friction", self.off_track_friction),
            ("spawn_position.x", x),
            ("spawn_position.y", y),
            ("spawn_position.z", z),
            ("spawn_heading", self.spawn_heading),
        ];
        if let Some(&bad) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Some(bad);
        }
        if self.max_speed <= 0.0 {
            return Some(("max_speed", self.max_speed));
        }
        if self.boost_multiplier <= 0.0 {
            return Some(("boost_multiplier", self.boost_multiplier));
        }
        [
            ("ground_friction", self.ground_friction),
            ("off_track_friction", self.off_track_friction),
        ]
        .into_iter()
        .find(|(_, f)| !(0.0..=1.0).contains(f))
    }

    /// Limits in effect for the given surface and boost state.
    #[must_use]
    pub fn effective_limits(&self, on_track: bool, boost: bool) -> Limits {
        let (speed_factor, accel_factor, friction, turn_factor) = if on_track {
            (1.0, 1.0, self.ground_friction, 1.0)
        } else {
            (
                OFF_TRACK_SPEED_FACTOR,
                OFF_TRACK_ACCEL_FACTOR,
                self.off_track_friction,
                OFF_TRACK_TURN_FACTOR,
            )
        };
        let (boost_speed, boost_accel) = if boost {
            (self.boost_multiplier, BOOST_ACCEL_FACTOR)
        } else {
            (1.0, 1.0)
        };
        Limits {
            max_speed: self.max_speed * boost_speed * speed_factor,
            acceleration: self.acceleration * boost_accel * accel_factor,
            friction,
            turn_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = VehicleTuning::default();
        assert_eq!(t.max_speed, 0.15);
        assert_eq!(t.boost_multiplier, 2.0);
        assert_eq!(t.spawn_position, [0.0, 0.5, 15.0]);
    }

    #[test]
    fn test_limits_on_track_boost() {
        let l = VehicleTuning::default().effective_limits(true, true);
        assert!((l.max_speed - 0.3).abs() < 1e-6);
        assert!((l.acceleration - 0.0075).abs() < 1e-6);
        assert_eq!(l.friction, 0.95);
        assert_eq!(l.turn_factor, 1.0);
    }

    #[test]
    fn test_limits_off_track() {
        let l = VehicleTuning::default().effective_limits(false, false);
        assert!((l.max_speed - 0.105).abs() < 1e-6);
        assert!((l.acceleration - 0.004).abs() < 1e-6);
        assert_eq!(l.friction, 0.8);
        assert_eq!(l.turn_factor, 0.7);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(VehicleTuning::default().invalid_parameter(), None);
    }

    #[test]
    fn test_invalid_parameters_reported() {
        let negative_boost = VehicleTuning {
            boost_multiplier: -1.0,
            ..VehicleTuning::default()
        };
        assert_eq!(
            negative_boost.invalid_parameter(),
            Some(("boost_multiplier", -1.0))
        );

        let nan_speed = VehicleTuning {
            max_speed: f32::NAN,
            ..VehicleTuning::default()
        };
        assert_eq!(nan_speed.invalid_parameter().map(|(name, _)| name), Some("max_speed"));

        let zero_speed = VehicleTuning {
            max_speed: 0.0,
            ..VehicleTuning::default()
        };
        assert_eq!(zero_speed.invalid_parameter(), Some(("max_speed", 0.0)));

        let slippery = VehicleTuning {
            off_track_friction: 1.2,
            ..VehicleTuning::default()
        };
        assert_eq!(
            slippery.invalid_parameter(),
            Some(("off_track_friction", 1.2))
        );

        let lost = VehicleTuning {
            spawn_position: [0.0, f32::INFINITY, 0.0],
            ..VehicleTuning::default()
        };
        assert_eq!(
            lost.invalid_parameter().map(|(name, _)| name),
            Some("spawn_position.y")
        );
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let t: VehicleTuning = ron::from_str("(max_speed: 0.3)").unwrap();
        assert_eq!(t.max_speed, 0.3);
        assert_eq!(t.acceleration, 0.005);
    }
}
