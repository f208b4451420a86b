//! Configuration
//!
//! `StoreConfig` holds the knobs the record store itself honours.
//! `EditorConfig` is the optional JSON file the command line accepts:
//!
//! ```json
//! {
//!   "max_jump": 1048576,
//!   "recompute_checksum": true,
//!   "log_level": "warn"
//! }
//! ```
//!
//! Every field is optional. Command-line flags override file values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::record::Address;

/// Record store settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Highest resolved address a record may start at (None: no limit)
    #[serde(default)]
    pub max_jump: Option<Address>,
}

impl StoreConfig {
    /// Config with no jump limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the resolved address of appended records
    pub fn with_max_jump(mut self, limit: Address) -> Self {
        self.max_jump = Some(limit);
        self
    }
}

/// Settings file for the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum resolved address (optional, default unlimited)
    #[serde(default)]
    pub max_jump: Option<Address>,

    /// Repair checksums of edited records (optional, default true)
    #[serde(default = "default_recompute_checksum")]
    pub recompute_checksum: bool,

    /// Minimum log severity (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_recompute_checksum() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_jump: None,
            recompute_checksum: default_recompute_checksum(),
            log_level: default_log_level(),
        }
    }
}

/// Configuration load failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid log_level: '{0}'. Must be one of trace, info, warn, error, off.")]
    LogLevel(String),
}

impl EditorConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON text
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.min_severity().map(|_| ())
    }

    /// Minimum severity to log, None when logging is off
    pub fn min_severity(&self) -> Result<Option<Severity>, ConfigError> {
        match self.log_level.to_ascii_lowercase().as_str() {
            "off" => Ok(None),
            other => Severity::parse(other)
                .map(Some)
                .ok_or_else(|| ConfigError::LogLevel(self.log_level.clone())),
        }
    }

    /// Store settings derived from this file
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            max_jump: self.max_jump,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_default_unlimited() {
        assert_eq!(StoreConfig::default().max_jump, None);
        assert_eq!(StoreConfig::new().with_max_jump(0xFFFF).max_jump, Some(0xFFFF));
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert!(config.recompute_checksum);
        assert_eq!(config.min_severity().unwrap(), Some(Severity::Warn));
    }

    #[test]
    fn test_full_json() {
        let config = EditorConfig::from_json(
            r#"{"max_jump": 65535, "recompute_checksum": false, "log_level": "off"}"#,
        )
        .unwrap();
        assert_eq!(config.store_config().max_jump, Some(65535));
        assert!(!config.recompute_checksum);
        assert_eq!(config.min_severity().unwrap(), None);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let err = EditorConfig::from_json(r#"{"log_level": "loud"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::LogLevel(_)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = EditorConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hexpatch.json");
        fs::write(&path, r#"{"log_level": "info"}"#).unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.min_severity().unwrap(), Some(Severity::Info));

        let missing = EditorConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read(_)));
    }
}
