//! Headless Pitlane driver.
//!
//! Loads `config.ron`, builds the track, replays a key script (or the
//! built-in demo lap) through a drive session and logs the HUD as it goes.
//!
//! Run with: `cargo run -p pitlane-sim -- --script lap.ron --summary run.json`

mod error;
mod runner;
mod script;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use pitlane_config::{CliArgs, Config, default_config_dir};
use pitlane_session::{DriveSession, FrameClock};
use pitlane_track::Track;
use tracing::{error, info};

use crate::error::SimError;
use crate::runner::{RunSummary, run_script};
use crate::script::DriveScript;

/// CLI arguments for the headless driver.
#[derive(Parser, Debug)]
#[command(name = "pitlane-sim", about = "Headless Pitlane drive runner")]
struct SimArgs {
    #[command(flatten)]
    common: CliArgs,

    /// RON key script to replay. Runs the demo lap when omitted.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Stop after this many ticks.
    #[arg(long)]
    ticks: Option<u64>,

    /// Log a HUD line every N ticks (0 disables).
    #[arg(long)]
    hud_interval: Option<u64>,

    /// Catalog id of the vehicle to drive.
    #[arg(long)]
    vehicle: Option<String>,

    /// Write a JSON run summary to this path.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Directory for the JSON log file.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("pitlane").join("logs"))
}

fn load_config(args: &SimArgs) -> Result<Config, SimError> {
    let config_dir = match args.common.config.clone() {
        Some(dir) => dir,
        None => default_config_dir()?,
    };
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(&args.common)?;
    if let Some(ref id) = args.vehicle {
        if !config.catalog.select(id) {
            return Err(SimError::UnknownVehicle(id.clone()));
        }
    }
    Ok(config)
}

fn load_script(args: &SimArgs) -> Result<DriveScript, SimError> {
    let script = match args.script.as_deref() {
        Some(path) => {
            info!("Loading key script {}", path.display());
            DriveScript::load(path)?
        }
        None => {
            info!("No script given, running the demo lap");
            DriveScript::demo_lap()
        }
    };
    let script = match args.ticks {
        Some(ticks) => script.truncated(ticks),
        None => script,
    };
    info!("Script: {} ticks, {} key events", script.ticks(), script.events().len());
    Ok(script)
}

fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), SimError> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).map_err(|source| SimError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Run summary written to {}", path.display());
    Ok(())
}

fn run(args: &SimArgs, config: &Config) -> Result<RunSummary, SimError> {
    let track = Track::from_settings(&config.track)?;
    let script = load_script(args)?;

    if let Some(spec) = config.catalog.selected() {
        info!("Vehicle: {} ({})", spec.name, spec.model);
    }
    info!(
        "Track: {} | {} triangles | camera: {}",
        track.name(),
        track.triangle_count(),
        config.camera.initial_mode.label()
    );

    let mut session = DriveSession::start(config, Some(track));
    let mut clock = FrameClock::new(config.session.target_fps, config.session.frame_budget());
    let hud_interval = args
        .hud_interval
        .unwrap_or(config.session.hud_interval_ticks);

    let summary = run_script(&mut session, &script, &mut clock, hud_interval);
    session.end();

    info!(
        "Drove {:.1} units in {} ticks ({:.1}s), top speed {:.1} km/h, {:.0}% on track",
        summary.distance,
        summary.ticks,
        summary.sim_time_secs,
        summary.top_speed_kmh,
        summary.on_track_ratio() * 100.0
    );

    if let Some(ref path) = args.summary {
        write_summary(path, &summary)?;
    }
    Ok(summary)
}

fn main() -> ExitCode {
    let args = SimArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            pitlane_log::init_logging(None, false, None);
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let log_dir = args.log_dir.clone().or_else(default_log_dir);
    pitlane_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    info!("Pitlane headless run");
    match run(&args, &config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
