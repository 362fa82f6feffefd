use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn env_filter(default_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.unwrap_or("info")))
}

/// Log to a file; the TUI owns the terminal so nothing may go to stderr.
pub fn init_file(log_path: &Path, default_level: Option<&str>) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

pub fn init_stderr(default_level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level.or(Some("warn"))))
        .with_writer(std::io::stderr)
        .init();
}
