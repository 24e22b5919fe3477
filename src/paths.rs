//! Playground path management
//!
//! - **Local mode**: if `playground.yaml` exists in the current working
//!   directory, config and state live next to it. This is what `cargo run`
//!   from a checkout picks up.
//! - **Installed mode** (default): data lives under the platform data
//!   directory (`~/.local/share/miniapp-sdk`, `%APPDATA%\miniapp-sdk`, ...).

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::AppConfig;

/// Directory name used under the platform data directory
const APP_NAME: &str = "miniapp-sdk";

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = "playground.yaml";

/// Playground paths for config and state.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Path to the configuration file
    pub config: PathBuf,
    /// Path to the state directory (sled database)
    pub state_dir: PathBuf,
    /// Whether running from a local checkout (config in cwd)
    pub is_local: bool,
}

impl AppPaths {
    /// Detect the appropriate paths based on environment.
    ///
    /// Called before logging is initialized.
    pub fn detect() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::detect_in(&cwd, dirs::data_dir())
    }

    fn detect_in(cwd: &Path, data_dir: Option<PathBuf>) -> Self {
        let cwd_config = cwd.join(CONFIG_FILE);
        if cwd_config.exists() {
            return Self {
                config: cwd_config,
                state_dir: cwd.join(".state"),
                is_local: true,
            };
        }

        let app_data = data_dir.unwrap_or_else(|| cwd.to_path_buf()).join(APP_NAME);
        Self {
            config: app_data.join(CONFIG_FILE),
            state_dir: app_data.join("state"),
            is_local: false,
        }
    }

    /// Ensure the state directory exists and a config file is present.
    ///
    /// A missing config file is created from the defaults.
    pub async fn ensure_directories(&self) -> anyhow::Result<()> {
        if !self.state_dir.exists() {
            debug!("Creating state directory: {}", self.state_dir.display());
            std::fs::create_dir_all(&self.state_dir)?;
        }

        if !self.config.exists() {
            if let Some(config_parent) = self.config.parent() {
                std::fs::create_dir_all(config_parent)?;
            }

            AppConfig::default()
                .save(&self.config.to_string_lossy())
                .await
                .context("Failed to write default config")?;
            info!("Created default config at {}", self.config.display());
        }

        Ok(())
    }

    /// Get the sled database path (within state_dir)
    pub fn sled_db_path(&self) -> PathBuf {
        self.state_dir.join("sled")
    }
}
