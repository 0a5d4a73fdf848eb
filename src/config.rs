//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::range::DEFAULT_RANGE;
use crate::source::SourceConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub charts: ChartsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metrics backend connection
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10_000 // 10 seconds
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl From<&BackendConfig> for SourceConfig {
    fn from(config: &BackendConfig) -> Self {
        SourceConfig {
            base_url: config.base_url.clone(),
            request_timeout_ms: config.request_timeout_ms,
        }
    }
}

/// Chart rendering defaults
#[derive(Debug, Clone, Deserialize)]
pub struct ChartsConfig {
    /// Range used when the page URL has none
    #[serde(default = "default_range")]
    pub default_range: String,

    /// Where rendered charts are written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_range() -> String {
    DEFAULT_RANGE.to_string()
}

fn default_output_dir() -> String {
    "./charts".to_string()
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            default_range: default_range(),
            output_dir: default_output_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// The first existing file wins. A file that exists but cannot be read
    /// or parsed is an error rather than a silent fallback.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("healthsome").join("config.toml")),
            Some(PathBuf::from("/etc/healthsome/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::info!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Backend overrides
        if let Some(url) = var("HEALTHSOME_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(timeout) = var("HEALTHSOME_REQUEST_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.backend.request_timeout_ms = ms;
            }
        }

        // Chart overrides
        if let Some(range) = var("HEALTHSOME_DEFAULT_RANGE") {
            self.charts.default_range = range;
        }
        if let Some(dir) = var("HEALTHSOME_OUTPUT_DIR") {
            self.charts.output_dir = dir;
        }

        // Logging overrides
        if let Some(level) = var("HEALTHSOME_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("HEALTHSOME_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Healthsome Charts Configuration
#
# Environment variables override these settings:
# - HEALTHSOME_BACKEND_URL
# - HEALTHSOME_REQUEST_TIMEOUT_MS
# - HEALTHSOME_DEFAULT_RANGE
# - HEALTHSOME_OUTPUT_DIR
# - HEALTHSOME_LOG_LEVEL
# - HEALTHSOME_LOG_FORMAT

[backend]
# Healthsome backend origin
base_url = "http://localhost:5000"

# Request timeout in milliseconds
request_timeout_ms = 10000

[charts]
# Range used when none is given: last_week, last_month or all_time
default_range = "last_week"

# Directory rendered charts are written to
output_dir = "./charts"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
