//! Per-tick vehicle state transition.
//!
//! [`step_vehicle`] is a pure function of the held controls, the previous
//! state and the latest ground sample. The sample comes from the probe run at
//! the end of the previous tick, so surface changes are seen one tick late.

use pitlane_input::InputState;
use pitlane_track::GroundSample;
use tracing::trace;

use crate::state::{VehicleState, heading_forward};
use crate::tuning::{
    HANDBRAKE_TURN_FACTOR, HANDBRAKE_VELOCITY_FACTOR, MIN_STEER_SPEED, REVERSE_SPEED_FACTOR,
    STEER_DECAY, VehicleTuning, WHEEL_SPIN_FACTOR,
};

/// Advance the vehicle by one tick.
///
/// `height_offset` is the track's rest offset, added on top of the sample's
/// ground height. Without a ground sample the vehicle is treated as on track
/// and its height is left alone.
#[must_use]
pub fn step_vehicle(
    input: &InputState,
    prev: &VehicleState,
    ground: Option<&GroundSample>,
    height_offset: f32,
    tuning: &VehicleTuning,
) -> VehicleState {
    let on_track = ground.is_none_or(|g| g.on_track);
    let limits = tuning.effective_limits(on_track, input.boost);

    // Longitudinal
    let mut velocity = prev.velocity;
    if input.forward {
        velocity = (velocity + limits.acceleration).min(limits.max_speed);
    } else if input.backward {
        velocity = (velocity - limits.acceleration).max(-limits.max_speed * REVERSE_SPEED_FACTOR);
    } else if velocity > 0.0 {
        velocity = (velocity - tuning.deceleration).max(0.0);
    } else if velocity < 0.0 {
        velocity = (velocity + tuning.deceleration).min(0.0);
    }
    velocity *= limits.friction;
    // Releasing boost or leaving the track lowers the limit mid-stride.
    velocity = velocity.min(limits.max_speed).max(-limits.max_speed);

    // Steering
    let mut angular_velocity = prev.angular_velocity;
    if velocity.abs() > MIN_STEER_SPEED {
        let turn = tuning.turn_speed * (velocity / tuning.max_speed) * limits.turn_factor;
        if input.left {
            angular_velocity = turn;
        } else if input.right {
            angular_velocity = -turn;
        } else {
            angular_velocity *= STEER_DECAY;
        }
    } else {
        angular_velocity = 0.0;
    }

    if input.brake {
        velocity *= HANDBRAKE_VELOCITY_FACTOR;
        angular_velocity *= HANDBRAKE_TURN_FACTOR;
    }

    let rotation = prev.rotation + angular_velocity;
    let mut position = prev.position + heading_forward(rotation) * velocity;

    if let Some(ground) = ground {
        let target_y = ground.ground_height + height_offset;
        position.y = if position.y > target_y {
            (position.y - tuning.gravity).max(target_y)
        } else {
            target_y
        };
    }

    trace!(velocity, angular_velocity, rotation, on_track, "vehicle step");

    VehicleState {
        position,
        rotation,
        velocity,
        angular_velocity,
        is_on_track: on_track,
        wheel_angle: prev.wheel_angle + prev.velocity * WHEEL_SPIN_FACTOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use pitlane_input::Control;

    const OFFSET: f32 = 0.5;

    fn on_track() -> GroundSample {
        GroundSample {
            on_track: true,
            ground_height: 0.0,
        }
    }

    fn off_track() -> GroundSample {
        GroundSample {
            on_track: false,
            ground_height: 0.0,
        }
    }

    fn run(
        input: InputState,
        mut state: VehicleState,
        ground: Option<GroundSample>,
        ticks: usize,
    ) -> VehicleState {
        let tuning = VehicleTuning::default();
        for _ in 0..ticks {
            state = step_vehicle(&input, &state, ground.as_ref(), OFFSET, &tuning);
        }
        state
    }

    fn moving(velocity: f32) -> VehicleState {
        VehicleState {
            velocity,
            ..VehicleState::default()
        }
    }

    #[test]
    fn test_forward_converges_below_max() {
        let input = InputState::IDLE.with(Control::Forward);
        let state = run(input, VehicleState::default(), Some(on_track()), 100);
        // Fixed point of v = (v + a) * f.
        let steady = 0.005 * 0.95 / (1.0 - 0.95);
        assert!((state.velocity - steady).abs() < 0.002, "{}", state.velocity);
        assert!(state.velocity < 0.15);
    }

    #[test]
    fn test_first_tick_applies_friction() {
        let input = InputState::IDLE.with(Control::Forward);
        let state = run(input, VehicleState::default(), Some(on_track()), 1);
        assert!((state.velocity - 0.005 * 0.95).abs() < 1e-7);
    }

    #[test]
    fn test_speed_clamp_all_modes() {
        let tuning = VehicleTuning::default();
        for boost in [false, true] {
            for surface in [on_track(), off_track()] {
                for dir in [Control::Forward, Control::Backward] {
                    let mut input = InputState::IDLE.with(dir);
                    input.boost = boost;
                    let mut state = moving(0.29);
                    for _ in 0..300 {
                        state = step_vehicle(&input, &state, Some(&surface), OFFSET, &tuning);
                        let limit = tuning.effective_limits(surface.on_track, boost).max_speed;
                        assert!(state.velocity.abs() <= limit + 1e-6);
                    }
                }
            }
        }
    }

    #[test]
    fn test_releasing_boost_clamps_speed() {
        let tuning = VehicleTuning::default();
        let state = moving(0.28);
        let next = step_vehicle(&InputState::IDLE, &state, Some(&on_track()), OFFSET, &tuning);
        assert!(next.velocity <= tuning.max_speed + 1e-6);
    }

    #[test]
    fn test_reverse_limit() {
        let input = InputState::IDLE.with(Control::Backward);
        let state = run(input, VehicleState::default(), Some(on_track()), 500);
        assert!(state.velocity < 0.0);
        assert!(state.velocity >= -0.15 * 0.6 - 1e-6);
    }

    #[test]
    fn test_forward_wins_over_backward() {
        let input = InputState::IDLE
            .with(Control::Forward)
            .with(Control::Backward);
        let state = run(input, VehicleState::default(), Some(on_track()), 10);
        assert!(state.velocity > 0.0);
    }

    #[test]
    fn test_standstill_no_spin() {
        let input = InputState::IDLE.with(Control::Left);
        let mut state = moving(0.005);
        state.angular_velocity = 0.03;
        let next = run(input, state, Some(on_track()), 1);
        assert_eq!(next.angular_velocity, 0.0);
        assert_eq!(next.rotation, state.rotation);
    }

    #[test]
    fn test_monotonic_deceleration() {
        let mut state = moving(0.12);
        let mut previous = state.velocity;
        for _ in 0..200 {
            state = run(InputState::IDLE, state, Some(on_track()), 1);
            if previous > 0.0 {
                assert!(state.velocity < previous, "{} !< {}", state.velocity, previous);
            } else {
                assert_eq!(state.velocity, 0.0);
            }
            assert!(state.velocity >= 0.0);
            previous = state.velocity;
        }
        assert_eq!(state.velocity, 0.0);
    }

    #[test]
    fn test_unvalidated_tuning_does_not_panic() {
        let boost = InputState::IDLE.with(Control::Forward).with(Control::Boost);
        let negative_boost = VehicleTuning {
            boost_multiplier: -1.0,
            ..VehicleTuning::default()
        };
        let state = step_vehicle(
            &boost,
            &VehicleState::default(),
            Some(&on_track()),
            OFFSET,
            &negative_boost,
        );
        assert!(state.velocity.is_finite());

        let nan_speed = VehicleTuning {
            max_speed: f32::NAN,
            ..VehicleTuning::default()
        };
        let _ = step_vehicle(
            &boost,
            &moving(0.1),
            Some(&on_track()),
            OFFSET,
            &nan_speed,
        );
    }

    #[test]
    fn test_reverse_coast_stops_at_zero() {
        let state = run(InputState::IDLE, moving(-0.05), Some(on_track()), 200);
        assert_eq!(state.velocity, 0.0);
    }

    #[test]
    fn test_steering_direction_and_scale() {
        let tuning = VehicleTuning::default();
        let left = step_vehicle(
            &InputState::IDLE.with(Control::Left),
            &moving(0.1),
            Some(&on_track()),
            OFFSET,
            &tuning,
        );
        let v = (0.1 - 0.004) * 0.95;
        assert!((left.angular_velocity - 0.04 * v / 0.15).abs() < 1e-6);
        assert!(left.rotation > 0.0);

        let right = step_vehicle(
            &InputState::IDLE.with(Control::Right),
            &moving(0.1),
            Some(&off_track()),
            OFFSET,
            &tuning,
        );
        let v = (0.1_f32 - 0.004) * 0.8;
        let v = v.min(0.105);
        assert!((right.angular_velocity + 0.04 * v / 0.15 * 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_left_wins_over_right() {
        let input = InputState::IDLE.with(Control::Left).with(Control::Right);
        let state = run(input, moving(0.1), Some(on_track()), 1);
        assert!(state.angular_velocity > 0.0);
    }

    #[test]
    fn test_reversing_inverts_steering() {
        let input = InputState::IDLE.with(Control::Left);
        let state = run(input, moving(-0.08), Some(on_track()), 1);
        assert!(state.angular_velocity < 0.0);
    }

    #[test]
    fn test_steering_decays_when_released() {
        let mut state = moving(0.1);
        state.angular_velocity = 0.02;
        let next = run(InputState::IDLE.with(Control::Forward), state, Some(on_track()), 1);
        assert!((next.angular_velocity - 0.018).abs() < 1e-7);
    }

    #[test]
    fn test_moves_along_heading() {
        let mut state = moving(0.1);
        state.rotation = std::f32::consts::FRAC_PI_2;
        state.position = Vec3::new(0.0, OFFSET, 0.0);
        let next = run(InputState::IDLE.with(Control::Forward), state, None, 1);
        assert!(next.position.x > 0.0);
        assert!(next.position.z.abs() < 1e-6);
    }

    #[test]
    fn test_offtrack_handbrake_drains_motion() {
        let mut state = moving(0.2);
        state.angular_velocity = 0.05;
        let input = InputState::IDLE.with(Control::Brake).with(Control::Left);
        let state = run(input, state, Some(off_track()), 30);
        assert!(state.velocity.abs() < 1e-3);
        assert_eq!(state.angular_velocity, 0.0);
    }

    #[test]
    fn test_falls_then_pins_to_ground() {
        let sample = GroundSample {
            on_track: true,
            ground_height: 2.0,
        };
        let mut state = VehicleState::default();
        state.position.y = 2.6;
        let target = 2.0 + OFFSET;

        let one = run(InputState::IDLE, state, Some(sample), 1);
        assert!((one.position.y - 2.59).abs() < 1e-6);

        let settled = run(InputState::IDLE, state, Some(sample), 50);
        assert_eq!(settled.position.y, target);
    }

    #[test]
    fn test_below_ground_snaps_up() {
        let sample = GroundSample {
            on_track: true,
            ground_height: 1.0,
        };
        let mut state = VehicleState::default();
        state.position.y = -3.0;
        let next = run(InputState::IDLE, state, Some(sample), 1);
        assert_eq!(next.position.y, 1.0 + OFFSET);
    }

    #[test]
    fn test_no_ground_sample_keeps_height_and_track_physics() {
        let mut state = VehicleState::default();
        state.position.y = 7.0;
        let next = run(InputState::IDLE.with(Control::Forward), state, None, 1);
        assert_eq!(next.position.y, 7.0);
        assert!(next.is_on_track);
        assert!((next.velocity - 0.005 * 0.95).abs() < 1e-7);
    }

    #[test]
    fn test_wheel_spin_accumulates() {
        let state = run(InputState::IDLE.with(Control::Forward), moving(0.1), None, 3);
        assert!(state.wheel_angle > 0.0);
    }
}
