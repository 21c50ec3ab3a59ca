use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub playback: PlaybackConfig,
    pub users: UserDirectoryConfig,
    pub lifecycle: LifecycleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Upper bound for a client-reported network delay, in seconds.
    /// Larger estimates are clamped before they are applied.
    pub max_delay_seconds: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_delay_seconds: 5.0,
        }
    }
}

/// Display name cache in front of the user store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDirectoryConfig {
    pub cache_capacity: u64,
    pub cache_ttl_seconds: u64,
}

impl Default for UserDirectoryConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 10_000,
            cache_ttl_seconds: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Time budget for each exit/reload task
    pub task_timeout_seconds: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            task_timeout_seconds: 30,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> crate::Result<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // SYNCTV_LOGGING__LEVEL, SYNCTV_PLAYBACK__MAX_DELAY_SECONDS, ...
        builder = builder.add_source(
            Environment::with_prefix("SYNCTV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> crate::Result<Self> {
        Self::load(Some(path))
    }

    /// Check values that deserialize fine but cannot work at runtime.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be \"json\" or \"pretty\", got \"{}\"",
                self.logging.format
            ));
        }
        if !self.playback.max_delay_seconds.is_finite() || self.playback.max_delay_seconds < 0.0 {
            errors.push(format!(
                "playback.max_delay_seconds must be a non-negative number, got {}",
                self.playback.max_delay_seconds
            ));
        }
        if self.users.cache_capacity == 0 {
            errors.push("users.cache_capacity must be greater than 0".to_string());
        }
        if self.lifecycle.task_timeout_seconds == 0 {
            errors.push("lifecycle.task_timeout_seconds must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
