//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pitlane_camera::CameraTuning;
use pitlane_track::TrackSettings;
use pitlane_vehicle::{VehicleCatalog, VehicleTuning};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Vehicle physics.
    pub vehicle: VehicleTuning,
    /// Track selection and probe settings.
    pub track: TrackSettings,
    /// Camera distances and smoothing.
    pub camera: CameraTuning,
    pub input: InputConfig,
    /// Drive session pacing.
    pub session: SessionConfig,
    pub debug: DebugConfig,
    /// Selectable vehicles.
    pub catalog: VehicleCatalog,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (control name -> key name).
    pub keybindings: HashMap<String, String>,
    /// Full control map file. Falls back to the default map when absent.
    pub controls_file: Option<PathBuf>,
}

/// Drive session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Frames per second the tick is expected to run at.
    pub target_fps: u32,
    /// Ticks between HUD log lines (0 disables them).
    pub hud_interval_ticks: u64,
    /// Frames longer than this are logged as slow (0 = one target frame).
    pub frame_budget_ms: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write the JSON log file even in release builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            hud_interval_ticks: 60,
            frame_budget_ms: 0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

impl SessionConfig {
    /// Frame budget in milliseconds, defaulting to one frame at `target_fps`.
    pub fn frame_budget(&self) -> std::time::Duration {
        if self.frame_budget_ms > 0 {
            std::time::Duration::from_millis(u64::from(self.frame_budget_ms))
        } else {
            std::time::Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
        }
    }
}

/// Platform config directory for Pitlane, e.g. `~/.config/pitlane`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("pitlane"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Reject vehicle tuning the integrator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.vehicle.invalid_parameter() {
            Some((field, value)) => {
                log::warn!("Rejecting vehicle.{field} = {value}");
                Err(ConfigError::InvalidTuning { field, value })
            }
            None => Ok(()),
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_camera::CameraMode;
    use pitlane_track::TrackKind;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("max_speed: 0.15"));
        assert!(ron_str.contains("target_fps: 60"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.track.mesh_path = Some(PathBuf::from("tracks/oval.ron"));
        config
            .input
            .keybindings
            .insert("boost".to_string(), "ControlLeft".to_string());
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(vehicle: (max_speed: 0.2), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.vehicle.max_speed, 0.2);
        assert_eq!(config.vehicle.gravity, 0.01);
        assert_eq!(config.camera, CameraTuning::default());
        assert_eq!(config.track.kind, TrackKind::Simple);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_enum_fields_parse() {
        let ron_str = "(track: (kind: Detailed, mesh_path: Some(\"a.ron\")), camera: (initial_mode: Cockpit))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.track.kind, TrackKind::Detailed);
        assert_eq!(config.track.mesh_path, Some(PathBuf::from("a.ron")));
        assert_eq!(config.camera.initial_mode, CameraMode::Cockpit);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.vehicle.boost_multiplier = 3.0;
        config.session.hud_interval_ticks = 10;
        config.catalog.selected = "car2".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.camera.follow_distance = 12.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().camera.follow_distance, 12.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_invalid_tuning_in_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "(vehicle: (ground_friction: 1.5))",
        )
        .unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidTuning {
                field: "ground_friction",
                ..
            }
        ));
    }

    #[test]
    fn test_reload_rejects_invalid_tuning() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "(vehicle: (max_speed: -0.1))",
        )
        .unwrap();
        assert!(matches!(
            config.reload(dir.path()),
            Err(ConfigError::InvalidTuning {
                field: "max_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_frame_budget() {
        let mut session = SessionConfig::default();
        assert_eq!(session.frame_budget().as_micros(), 16_666);
        session.frame_budget_ms = 5;
        assert_eq!(session.frame_budget().as_millis(), 5);
    }
}
