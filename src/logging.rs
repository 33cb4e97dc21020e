//! Debug logging
//!
//! The terminal belongs to the UI, so events go to
//! `<config dir>/development.log`. Logging is off unless `--debug` is
//! passed; `RUST_LOG` overrides the default filter.

use crate::config::Config;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "lazypanes=debug";

pub fn log_path() -> Option<PathBuf> {
    Config::config_dir().map(|dir| dir.join("development.log"))
}

/// Install the file subscriber. Returns where the log is written.
pub fn init() -> Result<PathBuf> {
    let path = log_path().context("Could not determine config directory")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(path)
}
