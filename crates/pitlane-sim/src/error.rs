use std::path::PathBuf;

use pitlane_config::ConfigError;
use pitlane_track::TrackError;
use thiserror::Error;

use crate::script::ScriptError;

/// Anything that stops a headless run before or after the drive loop.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("track error: {0}")]
    Track(#[from] TrackError),

    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    #[error("unknown vehicle '{0}'")]
    UnknownVehicle(String),

    #[error("failed to serialize run summary: {0}")]
    Summary(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
