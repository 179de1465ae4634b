//! Reporter configuration loading from file and environment variables.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Reporter settings.
    #[serde(default)]
    pub reporter: ReporterConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for a [`Reporter`](crate::Reporter) and its outbound channel.
#[derive(Debug, Clone, Deserialize)]
pub struct ReporterConfig {
    /// Name stamped on every report. Must be set before a reporter is built.
    #[serde(default)]
    pub service_name: String,

    /// Seconds to wait for the producer to drain on close.
    #[serde(default = "default_close_timeout_secs")]
    pub close_timeout_secs: u64,

    /// Payloads buffered before senders suspend.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl ReporterConfig {
    /// The close timeout as a [`Duration`].
    pub fn close_timeout(&self) -> Duration {
        Duration::from_secs(self.close_timeout_secs)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "faultline_client=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_close_timeout_secs() -> u64 {
    10
}

fn default_channel_capacity() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            close_timeout_secs: default_close_timeout_secs(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `FAULTLINE_SERVICE_NAME` overrides `reporter.service_name`
/// - `FAULTLINE_CLOSE_TIMEOUT_SECS` overrides `reporter.close_timeout_secs`
/// - `FAULTLINE_CHANNEL_CAPACITY` overrides `reporter.channel_capacity`
/// - `FAULTLINE_LOG_LEVEL` overrides `logging.level`
/// - `FAULTLINE_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies `FAULTLINE_*` overrides read through `lookup`.
///
/// Values that fail to parse are ignored.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(name) = lookup("FAULTLINE_SERVICE_NAME") {
        config.reporter.service_name = name;
    }
    if let Some(secs) = lookup("FAULTLINE_CLOSE_TIMEOUT_SECS") {
        if let Ok(parsed) = secs.parse() {
            config.reporter.close_timeout_secs = parsed;
        }
    }
    if let Some(capacity) = lookup("FAULTLINE_CHANNEL_CAPACITY") {
        if let Ok(parsed) = capacity.parse() {
            config.reporter.channel_capacity = parsed;
        }
    }
    if let Some(level) = lookup("FAULTLINE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("FAULTLINE_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}
