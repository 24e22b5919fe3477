//! Mini App SDK playground
//!
//! Drives a main button against an in-process host bridge so the component
//! lifecycle can be explored from a terminal.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod paths;

use crate::cli::{Command, Flow};
use crate::config::{AppConfig, StorageBackend, ThemeWatcher};
use crate::paths::AppPaths;
use miniapp_sdk::bridge::LocalBridge;
use miniapp_sdk::components::{ButtonState, MainButton};
use miniapp_sdk::navigation::NavigationType;
use miniapp_sdk::storage::{MemoryStorage, SledStorage, Storage};

/// Mini App SDK playground - drive a main button from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Treat this launch as a page reload (restores persisted state)
    #[arg(long)]
    reload: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let paths = AppPaths::detect();

    init_logging(&args.log_level)?;

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => {
            paths.ensure_directories().await?;
            paths.config.to_string_lossy().to_string()
        }
    };
    info!("Starting Mini App SDK playground...");
    info!(
        "Configuration file: {} ({} mode)",
        config_path,
        if paths.is_local { "local" } else { "installed" }
    );

    let config = AppConfig::load(&config_path)
        .await
        .context("Failed to load initial config")?;
    let theme_watcher = ThemeWatcher::spawn(PathBuf::from(&config_path), config.theme.clone())?;

    run_app(&args, &paths, config, theme_watcher).await?;

    info!("Playground shutdown complete");
    Ok(())
}

async fn run_app(
    args: &Args,
    paths: &AppPaths,
    config: AppConfig,
    mut theme_watcher: ThemeWatcher,
) -> Result<()> {
    let bridge = Arc::new(LocalBridge::new());
    bridge.add_sink(cli::print_outbound);

    let storage = open_storage(&config, paths)?;

    let navigation = if args.reload {
        NavigationType::Reload
    } else {
        config.launch.navigation_type()
    };
    info!("Simulating page load: {}", navigation);

    let button = MainButton::new(bridge.clone(), storage, Arc::new(navigation))
        .with_theme(config.theme.clone());

    let _clicks = button.on_click(miniapp_sdk::bridge::listener(|_| {
        info!("🖱️  Main button pressed");
    }));

    button.mount().context("Failed to mount main button")?;
    if let Some(initial) = &config.main_button {
        button.set_params(ButtonState::from(initial));
    }

    println!("Type 'help' for commands.");
    let mut lines = cli::spawn_line_reader();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    info!("Input closed, stopping");
                    break;
                };

                let outcome = Command::parse(&line)
                    .and_then(|command| cli::execute(command, &button, &bridge));
                match outcome {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => warn!("{:#}", e),
                }
            }

            Some(theme) = theme_watcher.next_theme() => {
                info!("📝 Theme changed in config, applying to main button");
                button.set_theme(theme);
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    button.unmount();
    Ok(())
}

fn open_storage(config: &AppConfig, paths: &AppPaths) -> Result<Arc<dyn Storage>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageBackend::Sled => {
            let path = config
                .storage
                .path
                .clone()
                .unwrap_or_else(|| paths.sled_db_path());
            let storage = SledStorage::open(&path)
                .with_context(|| format!("Failed to open sled storage at {}", path.display()))?;
            Ok(Arc::new(storage))
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
