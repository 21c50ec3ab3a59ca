//! Configuration loading

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::Config;

const CWD_CONFIG: &str = "config.yaml";
const MOUNTED_CONFIG: &str = "/config/config.yaml";

/// Pick the config file to read, if any.
///
/// Search order:
/// 1. `explicit` (the `--config` flag)
/// 2. `SYNCTV_CONFIG_PATH`
/// 3. `./config.yaml`
/// 4. `/config/config.yaml` (container mount)
#[must_use]
pub fn config_path(explicit: Option<&str>) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var("SYNCTV_CONFIG_PATH").ok())
        .filter(|p| Path::new(p).exists())
        .or_else(|| {
            [CWD_CONFIG, MOUNTED_CONFIG]
                .into_iter()
                .find(|p| Path::new(p).exists())
                .map(str::to_string)
        })
}

/// Load configuration from a config file and environment variables.
///
/// Runs before logging is initialized, so progress goes to stderr. Fails fast
/// when the result does not validate.
pub fn load_config(explicit: Option<&str>) -> Result<Config> {
    let config = if let Some(path) = config_path(explicit) {
        eprintln!("Loading config from {path}");
        Config::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Falling back to environment variables");
            Config::from_env().unwrap_or_default()
        })
    } else {
        eprintln!("No config file found, using environment variables");
        Config::from_env().unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}");
            eprintln!("Using default configuration");
            Config::default()
        })
    };

    if let Err(errors) = config.validate() {
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s): {}",
            errors.len(),
            errors.join("; ")
        ));
    }

    info!(
        max_delay_seconds = config.playback.max_delay_seconds,
        task_timeout_seconds = config.lifecycle.task_timeout_seconds,
        "Configuration loaded"
    );

    Ok(config)
}
