//! Tracing set-up. The TUI owns the terminal, so logs go to a file.
//!
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{Context, Result};

/// Default log location when none is configured.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(concat!(env!("CARGO_PKG_NAME"), ".log"))
}

/// `RUST_LOG` wins when set; otherwise `level` applies to this crate and
/// everything else stays at `warn`.
pub fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(level))
}

/// Filter used when `RUST_LOG` is unset.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("warn,member_admin={level}"))
}

/// Install a global fmt subscriber appending to `path`.
pub fn init_logging(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_ctx(|| format!("create log directory {}", parent.display()))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()?;

    tracing::debug!(path = %path.display(), level, "logging initialized");
    Ok(())
}
