//! The four tick systems, chained in pipeline order.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use pitlane_track::TrackGeometry;
use pitlane_vehicle::step_vehicle;

use crate::resources::{
    CameraRigRes, GroundProbeRes, InputFrame, Observers, TickCount, TrackRes, TuningRes,
    VehicleSlot,
};

/// Advance the vehicle using the ground sample from the previous tick.
pub fn integrate_vehicle(
    input: Res<InputFrame>,
    tuning: Res<TuningRes>,
    ground: Res<GroundProbeRes>,
    mut vehicle: ResMut<VehicleSlot>,
) {
    let Some(prev) = vehicle.0 else {
        return;
    };
    let sample = ground.0.sample();
    vehicle.0 = Some(step_vehicle(
        &input.0.held,
        &prev,
        Some(&sample),
        ground.0.offset(),
        &tuning.0,
    ));
}

/// Re-sample the ground under the new position, for use next tick.
pub fn probe_ground(
    vehicle: Res<VehicleSlot>,
    track: Res<TrackRes>,
    mut ground: ResMut<GroundProbeRes>,
) {
    let Some(state) = vehicle.0 else {
        return;
    };
    let geometry = track.0.as_ref().map(|t| t as &dyn TrackGeometry);
    ground.0.probe(state.position, geometry);
}

/// Apply a pending mode cycle, then smooth the camera toward its target.
pub fn update_camera(
    input: Res<InputFrame>,
    vehicle: Res<VehicleSlot>,
    mut rig: ResMut<CameraRigRes>,
) {
    if input.0.cycle_camera {
        rig.0.cycle();
    }
    rig.0.update(vehicle.0.as_ref());
}

/// Publish the new vehicle state.
pub fn notify_observers(
    vehicle: Res<VehicleSlot>,
    mut tick: ResMut<TickCount>,
    mut observers: ResMut<Observers>,
) {
    tick.0 += 1;
    if let Some(state) = vehicle.0 {
        observers.notify(&state, tick.0);
    }
}

/// Build the single-threaded tick schedule.
pub fn build_tick_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            integrate_vehicle,
            probe_ground,
            update_camera,
            notify_observers,
        )
            .chain(),
    );
    schedule
}
