//! Configuration management for the QCV server.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. `.env` files
//! 3. Environment variables (with `QCV_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Artifact directory and public URLs
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8000")
    #[serde(default = "default_address")]
    pub address: String,

    /// Allowed CORS origins: "*" or a comma-separated list
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

/// Artifact storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding generated images
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Prefix of returned image URLs; `/static/<file>` is appended
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Delete artifacts older than this many seconds (unset keeps them forever)
    #[serde(default)]
    pub retention_secs: Option<u64>,

    /// Seconds between retention sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_cors_origins() -> String {
    "*".to_string()
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_public_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_sweep_interval() -> u64 {
    3600 // 1 hour
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
            public_base_url: default_public_base_url(),
            retention_secs: None,
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl StorageConfig {
    /// Retention window, if artifacts expire.
    pub fn retention(&self) -> Option<Duration> {
        self.retention_secs.map(Duration::from_secs)
    }

    /// Time between retention sweeps.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load .env file if it exists
    /// 2. Load from file if provided
    /// 3. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge `QCV_*` environment variables into this configuration.
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge overrides from `lookup`, keyed by environment variable name.
    ///
    /// Only keys that resolve override the current values. Numeric values that
    /// fail to parse are ignored.
    pub fn merge_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(v) = lookup("QCV_BIND") {
            self.server.address = v;
        }
        if let Some(v) = lookup("QCV_CORS_ORIGINS") {
            self.server.cors_origins = v;
        }

        // Storage
        if let Some(v) = lookup("QCV_ARTIFACT_DIR") {
            self.storage.artifact_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("QCV_PUBLIC_BASE_URL") {
            self.storage.public_base_url = v;
        }
        if let Some(v) = lookup("QCV_RETENTION_SECS") {
            if v.trim().is_empty() {
                self.storage.retention_secs = None;
            } else if let Ok(val) = v.trim().parse() {
                self.storage.retention_secs = Some(val);
            }
        }
        if let Some(v) = lookup("QCV_SWEEP_INTERVAL_SECS") {
            if let Ok(val) = v.trim().parse() {
                self.storage.sweep_interval_secs = val;
            }
        }

        // Logging
        if let Some(v) = lookup("QCV_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("QCV_LOG_FORMAT") {
            self.logging.format = v;
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address()?;

        if self.server.cors_origins.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "cors_origins must be \"*\" or a comma-separated origin list".to_string(),
            ));
        }

        let base = &self.storage.public_base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "public_base_url must start with http:// or https://: {base}"
            )));
        }

        if self.storage.artifact_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "artifact_dir must not be empty".to_string(),
            ));
        }

        if self.storage.retention_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "retention_secs must be greater than 0; omit it to keep artifacts".to_string(),
            ));
        }
        if self.storage.sweep_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "sweep_interval_secs must be greater than 0".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        Ok(())
    }

    /// Get the parsed bind address.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        self.server.address.parse().map_err(|_| {
            ConfigError::ValidationError(format!("Invalid bind address: {}", self.server.address))
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.address, "0.0.0.0:8000");
        assert_eq!(config.server.cors_origins, "*");
        assert_eq!(config.storage.artifact_dir, PathBuf::from("static"));
        assert_eq!(config.storage.public_base_url, "http://localhost:8000");
        assert_eq!(config.storage.retention_secs, None);
        assert_eq!(config.storage.sweep_interval_secs, 3600);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().merge_vars(vars(&[
            ("QCV_BIND", "127.0.0.1:9000"),
            ("QCV_PUBLIC_BASE_URL", "https://qcv.example.org"),
            ("QCV_RETENTION_SECS", "600"),
            ("QCV_LOG_FORMAT", "json"),
        ]));
        assert_eq!(config.bind_address().unwrap().port(), 9000);
        assert_eq!(config.storage.public_base_url, "https://qcv.example.org");
        assert_eq!(config.storage.retention(), Some(Duration::from_secs(600)));
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unparseable_number_is_ignored() {
        let config = Config::default().merge_vars(vars(&[("QCV_SWEEP_INTERVAL_SECS", "soon")]));
        assert_eq!(config.storage.sweep_interval_secs, 3600);
    }

    #[test]
    fn test_validate_invalid_address() {
        let mut config = Config::default();
        config.server.address = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_retention() {
        let mut config = Config::default();
        config.storage.retention_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = Config::default();
        config.storage.public_base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage:\n  artifact_dir: /tmp/qcv\n  retention_secs: 120").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.storage.artifact_dir, PathBuf::from("/tmp/qcv"));
        assert_eq!(config.storage.retention_secs, Some(120));
        assert_eq!(config.server.address, "0.0.0.0:8000");
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/qcv.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
