//! Configuration management
//!
//! Layers, lowest precedence first:
//! 1. user config (`<config dir>/tradedesk/config.yaml`)
//! 2. project-local `.tradedesk.yaml` in the working directory
//! 3. `TRADEDESK_*` environment variables
//!
//! Command-line flags override all of these and are applied by the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::pagination::{PAGE_SIZES, DEFAULT_PAGE_SIZE};
use crate::core::reorder::ReorderPolicy;
use crate::core::table::TableOptions;

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".tradedesk.yaml";

/// Dataset used when nothing else names one
pub const DEFAULT_DATA_FILE: &str = "orders.yaml";

/// Outbox used when nothing else names one
pub const DEFAULT_OUTBOX_DIR: &str = "rfq-outbox";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Order dataset (YAML or JSON)
    pub data_file: Option<PathBuf>,

    /// Directory submitted RFQs are written to
    pub outbox_dir: Option<PathBuf>,

    /// Name recorded on submitted RFQs
    pub author: Option<String>,

    /// Rows per page
    pub page_size: Option<usize>,

    /// What a drag does while the table is sorted
    pub reorder_policy: Option<ReorderPolicy>,
}

impl Config {
    /// Load every layer, warning about (and skipping) any that fail
    pub fn load() -> Self {
        let mut config = Config::default();

        let layers = [Self::user_config_path(), Some(PathBuf::from(LOCAL_CONFIG_FILE))];
        for path in layers.into_iter().flatten() {
            match Self::load_file(&path) {
                Ok(Some(layer)) => {
                    debug!(path = %path.display(), "loaded config layer");
                    config.merge(layer);
                }
                Ok(None) => {}
                Err(e) => warn!("{}", e),
            }
        }

        for e in config.apply_env() {
            warn!("{}", e);
        }
        config
    }

    /// `config.yaml` in the platform config directory
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tradedesk").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Read one config file; a missing file is not an error
    pub fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Some(Config::default()));
        }
        let config: Config =
            serde_yml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(Some(config))
    }

    /// Overlay `other` on top of `self`; set values in `other` win
    pub fn merge(&mut self, other: Config) {
        if other.data_file.is_some() {
            self.data_file = other.data_file;
        }
        if other.outbox_dir.is_some() {
            self.outbox_dir = other.outbox_dir;
        }
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.page_size.is_some() {
            self.page_size = other.page_size;
        }
        if other.reorder_policy.is_some() {
            self.reorder_policy = other.reorder_policy;
        }
    }

    /// Apply `TRADEDESK_*` environment variables
    ///
    /// A malformed variable is skipped and reported; the others still apply.
    pub fn apply_env(&mut self) -> Vec<ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Vec<ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut errors = Vec::new();

        if let Some(v) = get("TRADEDESK_DATA") {
            self.data_file = Some(PathBuf::from(v));
        }
        if let Some(v) = get("TRADEDESK_OUTBOX") {
            self.outbox_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("TRADEDESK_AUTHOR") {
            self.author = Some(v);
        }
        if let Some(v) = get("TRADEDESK_PAGE_SIZE") {
            match parse_page_size(&v) {
                Ok(size) => self.page_size = Some(size),
                Err(message) => errors.push(ConfigError::InvalidValue {
                    key: "TRADEDESK_PAGE_SIZE".to_string(),
                    message,
                }),
            }
        }
        if let Some(v) = get("TRADEDESK_REORDER_POLICY") {
            match v.parse::<ReorderPolicy>() {
                Ok(policy) => self.reorder_policy = Some(policy),
                Err(message) => errors.push(ConfigError::InvalidValue {
                    key: "TRADEDESK_REORDER_POLICY".to_string(),
                    message,
                }),
            }
        }
        errors
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(size) = self.page_size {
            if !PAGE_SIZES.contains(&size) {
                return Err(ConfigError::InvalidValue {
                    key: "page_size".to_string(),
                    message: format!("{} is not one of 10, 20, 30, 40 or 50", size),
                });
            }
        }
        Ok(())
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }

    pub fn outbox_dir(&self) -> PathBuf {
        self.outbox_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTBOX_DIR))
    }

    /// Author name: config, then the login user, then "unknown"
    pub fn author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn page_size(&self) -> usize {
        self.page_size
            .filter(|s| PAGE_SIZES.contains(s))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn reorder_policy(&self) -> ReorderPolicy {
        self.reorder_policy.unwrap_or_default()
    }

    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            page_size: self.page_size(),
            reorder_policy: self.reorder_policy(),
        }
    }
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    let size = raw.trim().parse::<usize>().map_err(|e| e.to_string())?;
    if PAGE_SIZES.contains(&size) {
        Ok(size)
    } else {
        Err(format!("{} is not one of 10, 20, 30, 40 or 50", size))
    }
}
