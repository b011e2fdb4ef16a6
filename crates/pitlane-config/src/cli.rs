//! Command-line argument parsing for Pitlane.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pitlane_camera::CameraMode;
use pitlane_track::TrackKind;

use crate::{Config, ConfigError};

/// Track kind as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TrackChoice {
    /// Procedural ring.
    Simple,
    /// Mesh loaded from `--track-mesh` or the config file.
    Detailed,
}

impl From<TrackChoice> for TrackKind {
    fn from(choice: TrackChoice) -> Self {
        match choice {
            TrackChoice::Simple => TrackKind::Simple,
            TrackChoice::Detailed => TrackKind::Detailed,
        }
    }
}

fn parse_camera_mode(s: &str) -> Result<CameraMode, String> {
    CameraMode::from_name(s)
        .ok_or_else(|| format!("unknown camera mode '{s}' (follow, front, overhead, side, cockpit)"))
}

/// Pitlane command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "pitlane", about = "Pitlane driving sandbox")]
pub struct CliArgs {
    /// Track kind.
    #[arg(long, value_enum)]
    pub track: Option<TrackChoice>,

    /// RON mesh file for a detailed track. Implies `--track detailed`.
    #[arg(long)]
    pub track_mesh: Option<PathBuf>,

    /// Initial camera mode.
    #[arg(long, value_parser = parse_camera_mode)]
    pub camera_mode: Option<CameraMode>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Vehicle top speed in world units per tick.
    #[arg(long)]
    pub max_speed: Option<f32>,

    /// Boost top-speed multiplier.
    #[arg(long)]
    pub boost_multiplier: Option<f32>,
}

impl Config {
    /// Apply CLI overrides to a loaded config, then validate the result.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) -> Result<(), ConfigError> {
        if let Some(choice) = args.track {
            self.track.kind = choice.into();
        }
        if let Some(ref mesh) = args.track_mesh {
            self.track.mesh_path = Some(mesh.clone());
            if args.track.is_none() {
                self.track.kind = TrackKind::Detailed;
            }
        }
        if let Some(mode) = args.camera_mode {
            self.camera.initial_mode = mode;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(speed) = args.max_speed {
            self.vehicle.max_speed = speed;
        }
        if let Some(mult) = args.boost_multiplier {
            self.vehicle.boost_multiplier = mult;
        }
        self.validate()
    }
}
