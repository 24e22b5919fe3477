//! Theme hot-reload for the playground
//!
//! The directory holding the config file is watched, so editors that save by
//! writing a temp file and renaming it are picked up too. A burst of file
//! events is collapsed into one re-read, and only a changed `theme` section
//! reaches the event loop.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::AppConfig;
use miniapp_sdk::theme::ThemeColors;

/// Quiet period that ends a burst of file events
const SETTLE: Duration = Duration::from_millis(150);

/// Emits the configured theme whenever it differs from the last one seen
pub struct ThemeWatcher {
    _watcher: RecommendedWatcher,
    themes: mpsc::Receiver<ThemeColors>,
}

impl ThemeWatcher {
    /// Start watching `config_path`; `current` is the theme already applied
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(config_path: PathBuf, current: ThemeColors) -> Result<Self> {
        let (touch_tx, touch_rx) = mpsc::unbounded_channel();
        let (theme_tx, themes) = mpsc::channel(4);

        let target = config_path.clone();
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, &target) => {
                    // Receiver gone means the playground is shutting down
                    let _ = touch_tx.send(());
                }
                Ok(_) => {}
                Err(e) => warn!("Config watch error: {}", e),
            })?;

        let dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config directory: {}", dir.display()))?;

        info!("Watching {} for theme changes", config_path.display());
        tokio::spawn(forward_theme_changes(config_path, current, touch_rx, theme_tx));

        Ok(Self {
            _watcher: watcher,
            themes,
        })
    }

    /// Wait for the next theme change; `None` once the watcher stopped
    pub async fn next_theme(&mut self) -> Option<ThemeColors> {
        self.themes.recv().await
    }
}

/// Whether a file event concerns the watched config file
fn touches(event: &Event, target: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == target.file_name())
}

/// Re-read the config after each settled burst and forward theme changes
async fn forward_theme_changes(
    config_path: PathBuf,
    mut current: ThemeColors,
    mut touched: mpsc::UnboundedReceiver<()>,
    themes: mpsc::Sender<ThemeColors>,
) {
    let path = config_path.to_string_lossy().to_string();

    while touched.recv().await.is_some() {
        while let Ok(Some(())) = tokio::time::timeout(SETTLE, touched.recv()).await {}

        let config = match AppConfig::load(&path).await {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config change, keeping current theme: {:#}", e);
                continue;
            }
        };

        if config.theme == current {
            debug!("Config changed without a theme change");
            continue;
        }

        current = config.theme.clone();
        if themes.send(config.theme).await.is_err() {
            break;
        }
    }

    debug!("Theme watcher stopped");
}
