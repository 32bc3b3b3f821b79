//! File-only tracing setup. The terminal belongs to ratatui, so nothing is
//! written to stdout or stderr while the UI runs.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::project_dirs;

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "NICHE_LOG";
const LOG_FILE: &str = "niche.log";

pub fn log_dir() -> PathBuf {
  project_dirs().map(|d| d.data_dir().join("logs")).unwrap_or_else(|| PathBuf::from("logs"))
}

/// Install the daily rolling file subscriber.
///
/// The returned guard flushes buffered lines on drop and must live as long as `main`.
pub fn init(default_level: &str) -> Result<WorkerGuard> {
  let dir = log_dir();
  std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;

  let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE);
  let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(non_blocking).with_ansi(false).with_target(true))
    .with(filter)
    .try_init()
    .context("Failed to install tracing subscriber")?;

  tracing::info!(dir = %dir.display(), "logging initialized");
  Ok(guard)
}
