//! Downward ground sampling beneath a vehicle.

use glam::Vec3;
use tracing::{debug, trace};

use crate::geometry::Ray;
use crate::track::{TrackGeometry, TrackKind};

/// Default height above the vehicle from which the ray starts.
pub const DEFAULT_PROBE_LIFT: f32 = 5.0;

/// Result of the most recent ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSample {
    pub on_track: bool,
    /// Hit height plus the track's rest offset.
    pub ground_height: f32,
}

impl Default for GroundSample {
    fn default() -> Self {
        Self {
            on_track: true,
            ground_height: 0.0,
        }
    }
}

/// Sample the ground under `position`.
///
/// A hit replaces the sample. A miss only clears `on_track`, keeping the
/// previous height so an airborne vehicle is not teleported.
#[must_use]
pub fn sample_ground(
    geometry: &dyn TrackGeometry,
    position: Vec3,
    lift: f32,
    offset: f32,
    previous: GroundSample,
) -> GroundSample {
    let ray = Ray::down(position + Vec3::Y * lift);
    match geometry.raycast(&ray) {
        Some(hit) => GroundSample {
            on_track: true,
            ground_height: hit.point.y + offset,
        },
        None => GroundSample {
            on_track: false,
            ground_height: previous.ground_height,
        },
    }
}

/// Stateful probe holding the last sample between ticks.
#[derive(Debug, Clone)]
pub struct GroundProbe {
    offset: f32,
    lift: f32,
    sample: GroundSample,
}

impl GroundProbe {
    pub fn new(kind: TrackKind) -> Self {
        Self::with_lift(kind, DEFAULT_PROBE_LIFT)
    }

    pub fn with_lift(kind: TrackKind, lift: f32) -> Self {
        Self {
            offset: kind.height_offset(),
            lift,
            sample: GroundSample::default(),
        }
    }

    /// Switch the offset profile, e.g. after a different track is loaded.
    pub fn set_kind(&mut self, kind: TrackKind) {
        self.offset = kind.height_offset();
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn sample(&self) -> GroundSample {
        self.sample
    }

    /// Re-run the probe at `position`. Without geometry the sample is left
    /// untouched.
    pub fn probe(&mut self, position: Vec3, geometry: Option<&dyn TrackGeometry>) -> GroundSample {
        let Some(geometry) = geometry else {
            trace!("No track geometry, probe skipped");
            return self.sample;
        };
        let next = sample_ground(geometry, position, self.lift, self.offset, self.sample);
        if next.on_track != self.sample.on_track {
            debug!(
                on_track = next.on_track,
                x = position.x,
                z = position.z,
                "Track contact changed"
            );
        }
        self.sample = next;
        self.sample
    }

    /// Forget the last sample.
    pub fn reset(&mut self) {
        self.sample = GroundSample::default();
    }
}
