//! Render configuration
//!
//! Read from `--config <file>` when given, otherwise from
//! `~/.config/felipe/config.toml` (platform equivalent) when it exists.
//! Every key is optional.
//!
//! ```toml
//! rankdir = "TB"
//! penwidth = "1.0"
//!
//! [undefined]
//! style = "dashed"
//! color = "gray"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Graph-wide DOT settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph layout direction
    pub rankdir: String,

    /// Graph font size
    pub fontsize: String,

    /// Line width of nodes and edges
    pub penwidth: String,

    /// Arrow head size of edges
    pub arrowsize: String,

    /// Extra node attributes for dependency targets that are not defined
    pub undefined: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rankdir: "LR".to_string(),
            fontsize: "11.0".to_string(),
            penwidth: "0.75".to_string(),
            arrowsize: "0.75".to_string(),
            undefined: BTreeMap::from([("style".to_string(), "dashed".to_string())]),
        }
    }
}

impl Config {
    /// Loads the configuration from `explicit` or the global location
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            return Self::load_file(path);
        }

        match Self::global_config_path() {
            Some(path) if path.is_file() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Returns the global config file location
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "felipe", "felipe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }
}
