//! World resources shared by the tick systems.

use bevy_ecs::prelude::*;
use pitlane_camera::CameraRig;
use pitlane_input::InputSnapshot;
use pitlane_track::{GroundProbe, Track};
use pitlane_vehicle::{VehicleState, VehicleTuning};

/// Input read at the start of the current tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputFrame(pub InputSnapshot);

/// The driven vehicle. `None` before spawn and after the session ends.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct VehicleSlot(pub Option<VehicleState>);

#[derive(Resource, Debug, Clone, Default)]
pub struct TuningRes(pub VehicleTuning);

/// Loaded track geometry. `None` while the track is still loading.
#[derive(Resource, Debug, Clone, Default)]
pub struct TrackRes(pub Option<Track>);

#[derive(Resource, Debug, Clone)]
pub struct GroundProbeRes(pub GroundProbe);

#[derive(Resource, Debug, Clone, Default)]
pub struct CameraRigRes(pub CameraRig);

/// Ticks completed since the session started.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCount(pub u64);

/// Handle returned by [`Observers::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&VehicleState, u64) + Send + Sync>;

/// Callbacks that receive every new vehicle state with its tick number.
#[derive(Resource, Default)]
pub struct Observers {
    next_id: u64,
    entries: Vec<(ObserverId, Observer)>,
}

impl Observers {
    pub fn add(&mut self, observer: impl FnMut(&VehicleState, u64) + Send + Sync + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn notify(&mut self, state: &VehicleState, tick: u64) {
        for (_, observer) in &mut self.entries {
            observer(state, tick);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_add_notify_remove() {
        let mut observers = Observers::default();
        let calls = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&calls);
        let id = observers.add(move |_, _| {
            seen.fetch_add(1, Ordering::Relaxed);
        });
        observers.notify(&VehicleState::default(), 1);
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        assert!(observers.remove(id));
        assert!(!observers.remove(id));
        observers.notify(&VehicleState::default(), 2);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert!(observers.is_empty());
    }
}
