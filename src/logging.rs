//! `tracing` subscriber setup.
//!
//! The terminal belongs to the TUI, so events go to a log file. Logging is
//! best-effort: if the file can't be opened the app runs without it.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{AppConfig, DEFAULT_LOG_LEVEL};

/// Environment variable overriding the configured filter.
pub const LOG_ENV: &str = "ARCHIVE_TUI_LOG";

/// Filter from `$ARCHIVE_TUI_LOG`, else `level`, else the default level.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Open `path` for appending, creating parent directories as needed.
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Returns the log file path on success.
pub fn init(config: &AppConfig) -> Option<PathBuf> {
    let path = config.log_file()?;
    let file = match open_log_file(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: can't open log file {}: {}", path.display(), e);
            return None;
        }
    };

    let installed = fmt()
        .with_env_filter(build_filter(config.log_level()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .try_init();

    match installed {
        Ok(()) => {
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
            Some(path)
        }
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    }
}
