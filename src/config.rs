//! Application configuration
//!
//! Read from `<config_dir>/cardstack/config.toml`. Every field is optional; a
//! missing file gives the defaults.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::JsonFileBackend;

pub const DEFAULT_STACK: &str = "Stack 1";
pub const NEW_STACK_LABEL: &str = "New Stack";
pub const DEFAULT_STORE_NAME: &str = "db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Could not determine a config directory")]
    ConfigDirNotFound,

    #[error("Could not determine a data directory")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AppConfig {
    /// Where the card store lives (default: local data dir + "cardstack")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Name of the durable card store
    pub store_name: String,
    /// Stack given to cards that have none
    pub default_stack: String,
    /// Placeholder label of the "create a stack" entry in editors
    pub new_stack_label: String,
    /// Fixed seed for deterministic shuffles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_seed: Option<u64>,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            store_name: DEFAULT_STORE_NAME.to_string(),
            default_stack: DEFAULT_STACK.to_string(),
            new_stack_label: NEW_STACK_LABEL.to_string(),
            shuffle_seed: None,
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("cardstack").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml(&content)?;
                log::debug!("Loaded config from {:?}", path);
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load from the default location
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_path()?)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        if config.default_stack.is_empty() {
            config.default_stack = DEFAULT_STACK.to_string();
        }
        if config.store_name.is_empty() {
            config.store_name = DEFAULT_STORE_NAME.to_string();
        }
        Ok(config)
    }

    /// Configured data directory, or the platform default
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => JsonFileBackend::default_data_dir().map_err(|_| ConfigError::DataDirNotFound),
        }
    }
}
