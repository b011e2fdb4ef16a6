//! Drives a session through a key script and collects run statistics.

use std::sync::{Arc, Mutex};

use glam::Vec3;
use pitlane_session::{DriveSession, FrameClock};
use pitlane_vehicle::VehicleState;
use serde::Serialize;
use tracing::{debug, info};

use crate::script::DriveScript;

/// Totals gathered from the observer stream.
#[derive(Debug, Default, Clone, Copy)]
struct TrackStats {
    last_position: Option<Vec3>,
    distance: f32,
    top_speed_kmh: f32,
    on_track_ticks: u64,
    off_track_ticks: u64,
}

impl TrackStats {
    fn observe(&mut self, state: &VehicleState) {
        if let Some(prev) = self.last_position {
            self.distance += prev.distance(state.position);
        }
        self.last_position = Some(state.position);
        self.top_speed_kmh = self.top_speed_kmh.max(state.speed_kmh().abs());
        if state.is_on_track {
            self.on_track_ticks += 1;
        } else {
            self.off_track_ticks += 1;
        }
    }
}

/// What a headless run produced, written out as JSON with `--summary`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub sim_time_secs: f64,
    pub final_state: Option<VehicleState>,
    pub camera_mode: String,
    pub camera_changes: u32,
    pub distance: f32,
    pub top_speed_kmh: f32,
    pub on_track_ticks: u64,
    pub off_track_ticks: u64,
    pub slow_frames: u64,
}

impl RunSummary {
    /// Share of observed ticks spent on the track, `1.0` when nothing ran.
    pub fn on_track_ratio(&self) -> f32 {
        let total = self.on_track_ticks + self.off_track_ticks;
        if total == 0 {
            1.0
        } else {
            self.on_track_ticks as f32 / total as f32
        }
    }
}

/// Replay `script` against `session`, one tick per frame.
///
/// A HUD line is logged every `hud_interval` ticks; `0` turns it off.
pub fn run_script(
    session: &mut DriveSession,
    script: &DriveScript,
    clock: &mut FrameClock,
    hud_interval: u64,
) -> RunSummary {
    let stats = Arc::new(Mutex::new(TrackStats::default()));
    let sink = Arc::clone(&stats);
    let observer = session.subscribe(move |state, _tick| {
        if let Ok(mut stats) = sink.lock() {
            stats.observe(state);
        }
    });

    let mut camera_mode = session.camera_mode();
    let mut camera_changes = 0;

    for tick in 0..script.ticks() {
        for event in script.events_at(tick) {
            let disposition = session.handle_key(event.to_raw());
            debug!(tick, key = ?event.key, action = ?event.action, ?disposition, "script key");
        }

        let ran = clock.frame(|| session.tick());
        if !ran {
            break;
        }

        if session.camera_mode() != camera_mode {
            camera_mode = session.camera_mode();
            camera_changes += 1;
        }

        if hud_interval > 0 && session.tick_count() % hud_interval == 0 {
            if let Some(hud) = session.hud() {
                info!("[tick {}] {}", hud.tick, hud);
            }
        }
    }

    session.unsubscribe(observer);
    let totals = stats.lock().map(|s| *s).unwrap_or_default();

    RunSummary {
        ticks: session.tick_count(),
        sim_time_secs: clock.sim_time(),
        final_state: session.vehicle(),
        camera_mode: camera_mode.label().to_string(),
        camera_changes,
        distance: totals.distance,
        top_speed_kmh: totals.top_speed_kmh,
        on_track_ticks: totals.on_track_ticks,
        off_track_ticks: totals.off_track_ticks,
        slow_frames: clock.slow_frames(),
    }
}
