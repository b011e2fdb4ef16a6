//! Structured logging and tracing for Pitlane.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. The level comes from `RUST_LOG` when set, otherwise
//! from the config file.

use pitlane_config::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file inside the log directory.
pub const LOG_FILE_NAME: &str = "pitlane.log";

/// Filter directive derived from `config`, before `RUST_LOG` is consulted.
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.trim().to_string()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Filter directive in effect: a parseable `rust_log` wins, then the
/// config's level, then [`DEFAULT_FILTER`].
pub fn resolve_filter(rust_log: Option<&str>, config: Option<&Config>) -> String {
    if let Some(env) = rust_log.map(str::trim).filter(|s| !s.is_empty())
        && EnvFilter::try_new(env).is_ok()
    {
        return env.to_string();
    }
    let directive = filter_directive(config);
    if EnvFilter::try_new(&directive).is_ok() {
        directive
    } else {
        DEFAULT_FILTER.to_string()
    }
}

/// Where the JSON log file goes, or `None` when no file layer is wanted.
pub fn file_log_target(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Option<PathBuf> {
    if wants_file_log(debug_build, config) {
        log_dir.map(log_file_path)
    } else {
        None
    }
}

/// Whether a JSON file layer should be installed.
pub fn wants_file_log(debug_build: bool, config: Option<&Config>) -> bool {
    debug_build || config.is_some_and(|c| c.debug.log_to_file)
}

/// Path of the JSON log file under `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file
/// * `debug_build` - enables the file layer; `debug.log_to_file` does too
/// * `config` - source of the log level when `RUST_LOG` is unset
///
/// ```no_run
/// use pitlane_config::Config;
/// use pitlane_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), cfg!(debug_assertions), Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = EnvFilter::new(resolve_filter(rust_log.as_deref(), config));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(log_path) = file_log_target(log_dir, debug_build, config)
        && log_path
            .parent()
            .is_none_or(|dir| std::fs::create_dir_all(dir).is_ok())
        && let Ok(log_file) = std::fs::File::create(&log_path)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
