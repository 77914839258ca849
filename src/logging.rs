use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LOG_ENV: &str = "VERSO_LOG";

fn env_filter(default_level: &str) -> EnvFilter {
    let level: tracing::Level = default_level.parse().unwrap_or(tracing::Level::WARN);
    EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy()
}

/// Compact logs on stderr, filtered by `VERSO_LOG` (falling back to `default_level`).
pub fn init_stderr(default_level: &str) {
    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(env_filter(default_level));
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

/// Logs appended to `path`; used while the terminal UI owns the screen.
pub fn init_file(path: &Path, default_level: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(env_filter(default_level));
    let _ = tracing_subscriber::registry().with(layer).try_init();
    Ok(())
}
