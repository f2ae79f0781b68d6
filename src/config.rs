//! Configuration loading and management
//!
//! Handles parsing of the optional `kanban.toml` file in the data directory.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::ListId;
use crate::error::{Error, Result};
use crate::store::DEFAULT_STORAGE_KEY;
use crate::toast::DEFAULT_TOAST_MS;

/// File name of the configuration inside the data directory
pub const CONFIG_FILE: &str = "kanban.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the board snapshot is kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Terminal board settings
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Record key of the snapshot (file `<key>.json`)
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { key: default_key() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a notification stays visible
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,

    /// Theme the terminal board starts in
    #[serde(default)]
    pub theme: Theme,

    /// List preselected when adding a task
    #[serde(default = "default_list")]
    pub default_list: ListId,
}

fn default_toast_ms() -> u64 {
    DEFAULT_TOAST_MS
}

fn default_list() -> ListId {
    ListId::Todo
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_ms: default_toast_ms(),
            theme: Theme::default(),
            default_list: default_list(),
        }
    }
}

impl Config {
    /// Load configuration from a `kanban.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let key = self.storage.key.trim();
        if key.is_empty() {
            return Err(Error::InvalidConfig(
                "storage.key cannot be empty".to_string(),
            ));
        }
        if key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(Error::InvalidConfig(format!(
                "storage.key '{key}' must be a plain file name"
            )));
        }
        if self.ui.toast_ms == 0 {
            return Err(Error::InvalidConfig(
                "ui.toast_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
