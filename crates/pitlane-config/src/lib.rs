//! Configuration for Pitlane.
//!
//! Settings persist to disk as `config.ron`. Every section is
//! `#[serde(default)]`, so older or partial files still load, and CLI flags
//! override whatever the file says.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, TrackChoice};
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, InputConfig, SessionConfig, default_config_dir,
};
pub use error::ConfigError;
