//! Store configuration.
//!
//! ```yaml
//! data_file: ./data/recipes.yaml
//! case_insensitive_search: true
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Settings for a [`crate::TableStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// YAML file the tables are persisted to; in memory only when unset
    pub data_file: Option<Utf8PathBuf>,
    /// Ignore case when matching title patterns
    pub case_insensitive_search: bool,
}

impl StoreConfig {
    /// Configuration of a store persisted to `path`.
    pub fn with_data_file(path: impl Into<Utf8PathBuf>) -> Self {
        StoreConfig {
            data_file: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(StoreConfig::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads the configuration from a YAML file.
    ///
    /// A relative `data_file` is resolved against the directory of the
    /// configuration file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&content)?;

        if let (Some(data_file), Some(dir)) = (config.data_file.as_mut(), path.parent()) {
            if data_file.is_relative() {
                let resolved = dir.join(data_file.as_path());
                *data_file = resolved;
            }
        }
        Ok(config)
    }
}
