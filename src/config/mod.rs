//! Configuration management for the playground
//!
//! Loads, validates and saves the YAML playground config. Theme edits are
//! picked up live through [`ThemeWatcher`].

pub mod watcher;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use miniapp_sdk::components::ButtonState;
use miniapp_sdk::navigation::NavigationType;
use miniapp_sdk::theme::ThemeColors;

pub use watcher::ThemeWatcher;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub theme: ThemeColors,
    #[serde(default)]
    pub launch: LaunchConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_button: Option<MainButtonConfig>,
}

/// Storage backend selection
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database path for the sled backend; defaults to the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sled,
}

/// How the simulated page was loaded
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LaunchConfig {
    #[serde(default)]
    pub reload: bool,
}

impl LaunchConfig {
    pub fn navigation_type(&self) -> NavigationType {
        if self.reload {
            NavigationType::Reload
        } else {
            NavigationType::Navigate
        }
    }
}

/// Initial main button parameters applied right after mount
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MainButtonConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_loader_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_shine_effect: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl From<&MainButtonConfig> for ButtonState {
    fn from(cfg: &MainButtonConfig) -> Self {
        ButtonState {
            is_visible: cfg.is_visible,
            is_enabled: cfg.is_enabled,
            is_loader_visible: cfg.is_loader_visible,
            has_shine_effect: cfg.has_shine_effect,
            text: cfg.text.clone(),
            background_color: cfg.background_color.clone(),
            text_color: cfg.text_color.clone(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config = Self::parse(&contents)
            .with_context(|| format!("Failed to load config: {}", path))?;

        Ok(config)
    }

    /// Parse and validate YAML contents
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.backend == StorageBackend::Sled
            && self.storage.path.is_none()
            && dirs::data_dir().is_none()
        {
            bail!("storage.path is required for the sled backend on this platform");
        }

        for (name, color) in [
            ("theme.button_color", &self.theme.button_color),
            ("theme.button_text_color", &self.theme.button_text_color),
        ] {
            if let Some(color) = color {
                if !is_hex_color(color) {
                    bail!("{} must be a #rrggbb colour, got '{}'", name, color);
                }
            }
        }

        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
