//! Drive session: owns the world, the tick schedule and the input sampler.

use bevy_ecs::prelude::*;
use pitlane_camera::{CameraMode, CameraPose, CameraRig};
use pitlane_config::Config;
use pitlane_input::{ControlMap, InputSampler, InputSnapshot, KeyDisposition, RawKeyEvent};
use pitlane_track::{GroundProbe, GroundSample, Track, TrackKind};
use pitlane_vehicle::VehicleState;
use tracing::{info, trace, warn};
use winit::event::KeyEvent;

use crate::resources::{
    CameraRigRes, GroundProbeRes, InputFrame, ObserverId, Observers, TickCount, TrackRes,
    TuningRes, VehicleSlot,
};
use crate::systems::build_tick_schedule;

/// HUD read-out for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub tick: u64,
    pub speed_kmh: f32,
    pub on_track: bool,
    pub camera_mode: CameraMode,
}

impl std::fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1} km/h | {} | Camera: {}",
            self.speed_kmh,
            if self.on_track { "On Track" } else { "Off Track" },
            self.camera_mode.label()
        )
    }
}

/// Build the control map described by `config`: the controls file if one is
/// configured, then per-control overrides on top.
pub fn control_map_from_config(config: &Config) -> ControlMap {
    let mut map = match config.input.controls_file.as_deref() {
        Some(path) => ControlMap::load(path),
        None => ControlMap::default(),
    };
    map.apply_overrides(&config.input.keybindings);
    for conflict in map.detect_conflicts() {
        warn!(
            "Key {:?} is bound to several controls: {:?}",
            conflict.key, conflict.controls
        );
    }
    map
}

/// One drive, from spawn to teardown.
///
/// Key events may arrive at any time through [`handle_key`](Self::handle_key);
/// [`tick`](Self::tick) reads them as one snapshot and runs the pipeline
/// integrate, probe, camera, notify in that order.
pub struct DriveSession {
    world: World,
    schedule: Schedule,
    sampler: InputSampler,
    active: bool,
}

impl DriveSession {
    /// Spawn the vehicle and attach input. `track` may be `None` while the
    /// track is still loading.
    pub fn start(config: &Config, track: Option<Track>) -> Self {
        Self::with_controls(config, control_map_from_config(config), track)
    }

    /// Like [`start`](Self::start) with an explicit control map.
    pub fn with_controls(config: &Config, controls: ControlMap, track: Option<Track>) -> Self {
        let kind = track.as_ref().map_or(config.track.kind, Track::kind);
        let spawn = VehicleState::spawn(&config.vehicle);

        let mut world = World::new();
        world.insert_resource(InputFrame::default());
        world.insert_resource(VehicleSlot(Some(spawn)));
        world.insert_resource(TuningRes(config.vehicle.clone()));
        world.insert_resource(GroundProbeRes(GroundProbe::with_lift(
            kind,
            config.track.probe_lift,
        )));
        world.insert_resource(CameraRigRes(CameraRig::new(config.camera.clone())));
        world.insert_resource(Observers::default());
        world.insert_resource(TickCount::default());

        let track_name = track.as_ref().map(|t| t.name().to_string());
        world.insert_resource(TrackRes(track));

        let mut sampler = InputSampler::new(controls);
        sampler.attach();

        info!(
            "Drive session started: vehicle at {:?}, track {}",
            spawn.position,
            track_name.as_deref().unwrap_or("<loading>")
        );

        Self {
            world,
            schedule: build_tick_schedule(),
            sampler,
            active: true,
        }
    }

    /// Feed a key event. Returns whether the host should suppress it.
    pub fn handle_key(&mut self, event: RawKeyEvent) -> KeyDisposition {
        self.sampler.handle_raw(event)
    }

    /// Feed a winit key event.
    pub fn handle_window_key(&mut self, event: &KeyEvent) -> KeyDisposition {
        self.sampler.handle_event(event)
    }

    /// Install or replace the track. The probe switches to the track's offset
    /// profile; the last sample is kept until the next tick re-probes.
    pub fn set_track(&mut self, track: Track) {
        info!("Track '{}' ready ({} triangles)", track.name(), track.triangle_count());
        self.world.resource_mut::<GroundProbeRes>().0.set_kind(track.kind());
        self.world.resource_mut::<TrackRes>().0 = Some(track);
    }

    /// Remove the track; the probe stops updating until a new one is set.
    pub fn clear_track(&mut self) {
        self.world.resource_mut::<TrackRes>().0 = None;
    }

    /// Run one pipeline pass. Returns `false` once the session has ended.
    pub fn tick(&mut self) -> bool {
        let snapshot = self.sampler.snapshot();
        self.tick_with(snapshot)
    }

    /// Run one tick with an explicit input snapshot instead of the sampler.
    pub fn tick_with(&mut self, snapshot: InputSnapshot) -> bool {
        if !self.active {
            return false;
        }
        self.world.resource_mut::<InputFrame>().0 = snapshot;
        self.schedule.run(&mut self.world);
        trace!(tick = self.tick_count(), "tick");
        true
    }

    /// Latest vehicle state, `None` after the session ended.
    pub fn vehicle(&self) -> Option<VehicleState> {
        self.world.resource::<VehicleSlot>().0
    }

    pub fn camera(&self) -> CameraPose {
        self.world.resource::<CameraRigRes>().0.pose()
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.world.resource::<CameraRigRes>().0.mode()
    }

    /// Ground sample the next tick will use.
    pub fn ground(&self) -> GroundSample {
        self.world.resource::<GroundProbeRes>().0.sample()
    }

    pub fn track_kind(&self) -> TrackKind {
        self.world
            .resource::<TrackRes>()
            .0
            .as_ref()
            .map_or(TrackKind::default(), Track::kind)
    }

    pub fn has_track(&self) -> bool {
        self.world.resource::<TrackRes>().0.is_some()
    }

    pub fn tick_count(&self) -> u64 {
        self.world.resource::<TickCount>().0
    }

    pub fn hud(&self) -> Option<HudSnapshot> {
        let vehicle = self.vehicle()?;
        Some(HudSnapshot {
            tick: self.tick_count(),
            speed_kmh: vehicle.speed_kmh(),
            on_track: vehicle.is_on_track,
            camera_mode: self.camera_mode(),
        })
    }

    /// Register a callback that receives every new vehicle state.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&VehicleState, u64) + Send + Sync + 'static,
    ) -> ObserverId {
        self.world.resource_mut::<Observers>().add(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.world.resource_mut::<Observers>().remove(id)
    }

    /// Cycle the camera on the next tick, as a UI button would.
    pub fn request_camera_cycle(&mut self) {
        if self.active {
            self.world.resource_mut::<CameraRigRes>().0.request_cycle();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Tear down: detach input, drop the vehicle and observers. Later ticks
    /// do nothing.
    pub fn end(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.sampler.detach();
        self.world.resource_mut::<VehicleSlot>().0 = None;
        self.world.resource_mut::<Observers>().clear();
        info!("Drive session ended after {} ticks", self.tick_count());
    }
}

impl Drop for DriveSession {
    fn drop(&mut self) {
        self.end();
    }
}
