//! Configuration for queues and record streams
//!
//! Settings are plain serde structs that can be loaded from TOML:
//!
//! ```toml
//! [heap]
//! initial_capacity = 16
//!
//! [stream]
//! format = "json-lines"
//! ```
//!
//! Every field has a default, so an empty document (or a missing file) is a
//! valid configuration.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::RecordFormat;
use crate::heap_pqueue::INITIAL_CAPACITY;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Settings for every queue built from this config
    pub heap: HeapConfig,
    /// Settings for decoding record streams
    pub stream: StreamConfig,
}

/// Priority queue settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeapConfig {
    /// Slots allocated up front; must be nonzero
    pub initial_capacity: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: INITIAL_CAPACITY,
        }
    }
}

/// Record stream settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Wire format of input lines
    pub format: RecordFormat,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(ConfigError::Syntax)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `path`, falling back to defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(path.to_path_buf(), e)),
        };

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no queue can be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heap.initial_capacity == 0 {
            return Err(ConfigError::Invalid(
                "heap.initial_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("failed to read config at {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),
    /// The config file is not valid TOML for [`Config`]
    #[error("failed to parse config at {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),
    /// An in-memory document is not valid TOML for [`Config`]
    #[error("failed to parse config: {0}")]
    Syntax(#[source] toml::de::Error),
    /// The document parsed but holds an unusable value
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.heap.initial_capacity, INITIAL_CAPACITY);
        assert_eq!(config.stream.format, RecordFormat::Text);
        assert_eq!(Config::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_parse_full_document() {
        let config = Config::from_toml_str(
            r#"
            [heap]
            initial_capacity = 16

            [stream]
            format = "json-lines"
            "#,
        )
        .unwrap();
        assert_eq!(config.heap.initial_capacity, 16);
        assert_eq!(config.stream.format, RecordFormat::JsonLines);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = Config::from_toml_str("[heap]\ninitial_capacity = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let err = Config::from_toml_str("[stream]\nformat = \"csv\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax(_)));
        assert!(err.to_string().starts_with("failed to parse config: "));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[heap]\ninitial_capacity = 64").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.heap.initial_capacity, 64);
        assert_eq!(config.stream, StreamConfig::default());
    }

    #[test]
    fn test_parse_error_names_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[heap\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
