//! Scripted key input for headless runs.
//!
//! A script is a RON file listing key events by the tick they fire on:
//!
//! ```ron
//! (
//!     ticks: 300,
//!     events: [
//!         (tick: 0, key: "KeyW", action: Press),
//!         (tick: 120, key: "KeyA", action: Press),
//!         (tick: 180, key: "KeyA", action: Release),
//!         (tick: 200, key: "KeyC", action: Press),
//!     ],
//! )
//! ```
//!
//! Events for tick `n` are delivered before tick `n` runs.

use std::path::{Path, PathBuf};

use pitlane_input::{RawKeyEvent, key_from_name};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Errors produced while loading a key script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse script: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("unknown key '{name}' at tick {tick}")]
    UnknownKey { name: String, tick: u64 },

    #[error("event at tick {tick} is past the end of the script ({ticks} ticks)")]
    PastEnd { tick: u64, ticks: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    Press,
    Release,
    /// OS auto-repeat while the key stays down.
    Repeat,
}

/// One event as written in the script file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub tick: u64,
    pub key: String,
    pub action: KeyAction,
}

/// On-disk script layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptFile {
    /// Number of ticks to run.
    pub ticks: u64,
    #[serde(default)]
    pub events: Vec<ScriptEntry>,
}

/// A key event resolved to a physical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptEvent {
    pub tick: u64,
    pub key: KeyCode,
    pub action: KeyAction,
}

impl ScriptEvent {
    pub fn to_raw(self) -> RawKeyEvent {
        let key = PhysicalKey::Code(self.key);
        match self.action {
            KeyAction::Press => RawKeyEvent::press(key),
            KeyAction::Release => RawKeyEvent::release(key),
            KeyAction::Repeat => RawKeyEvent::repeat(key),
        }
    }
}

/// Validated key script, events ordered by tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveScript {
    ticks: u64,
    events: Vec<ScriptEvent>,
}

impl DriveScript {
    /// Resolve key names and order events. Events on the same tick keep
    /// their file order.
    pub fn from_file(file: ScriptFile) -> Result<Self, ScriptError> {
        let mut events = Vec::with_capacity(file.events.len());
        for entry in file.events {
            if entry.tick >= file.ticks {
                return Err(ScriptError::PastEnd {
                    tick: entry.tick,
                    ticks: file.ticks,
                });
            }
            let key = key_from_name(&entry.key).ok_or_else(|| ScriptError::UnknownKey {
                name: entry.key.clone(),
                tick: entry.tick,
            })?;
            events.push(ScriptEvent {
                tick: entry.tick,
                key,
                action: entry.action,
            });
        }
        events.sort_by_key(|e| e.tick);
        Ok(Self {
            ticks: file.ticks,
            events,
        })
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile = ron::from_str(contents)?;
        Self::from_file(file)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// Built-in lap of the default ring: accelerate down the straight, hold a
    /// left turn, boost, flick through two camera modes, then handbrake to a
    /// stop.
    pub fn demo_lap() -> Self {
        use KeyAction::{Press, Release};
        use KeyCode::{KeyA, KeyC, KeyW, ShiftLeft, Space};

        let events = [
            (0, KeyW, Press),
            (90, KeyA, Press),
            (150, KeyC, Press),
            (151, KeyC, Release),
            (240, ShiftLeft, Press),
            (300, KeyC, Press),
            (301, KeyC, Release),
            (360, ShiftLeft, Release),
            (420, KeyW, Release),
            (420, Space, Press),
            (470, KeyA, Release),
            (520, Space, Release),
        ];
        Self {
            ticks: 600,
            events: events
                .into_iter()
                .map(|(tick, key, action)| ScriptEvent { tick, key, action })
                .collect(),
        }
    }

    /// Stop the script after `ticks`, dropping later events.
    #[must_use]
    pub fn truncated(mut self, ticks: u64) -> Self {
        if ticks < self.ticks {
            self.ticks = ticks;
            self.events.retain(|e| e.tick < ticks);
        }
        self
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }

    /// Events scheduled for `tick`.
    pub fn events_at(&self, tick: u64) -> impl Iterator<Item = ScriptEvent> + '_ {
        let start = self.events.partition_point(|e| e.tick < tick);
        self.events[start..]
            .iter()
            .take_while(move |e| e.tick == tick)
            .copied()
    }
}
