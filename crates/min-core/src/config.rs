//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UI language, e.g. "en"
    pub locale: String,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Search-bar text length at which task suggestions appear
    pub task_suggestion_min_chars: usize,
    /// Directory for task files and other user data
    pub data_dir: PathBuf,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            locale: "en".to_string(),
            log_filter: "info".to_string(),
            task_suggestion_min_chars: 3,
            data_dir,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Min"))
            .unwrap_or_else(|| PathBuf::from(".min"))
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), locale = %config.locale, "Loaded config");

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
