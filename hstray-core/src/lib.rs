//! Core library for the hstray tray application
//!
//! This crate owns all interaction with the external `hotspotshield`
//! command-line tool: issuing connect/disconnect/status/login/location
//! requests, interpreting their text output, and exposing a small typed
//! API to the presentation layer.

pub mod config;
pub mod error;
pub mod locale;
pub mod types;
pub mod vpn;

use std::path::PathBuf;

/// Name of the per-user diagnostic log file, appended to `$HOME`.
const LOG_FILE_NAME: &str = ".hstray.log";

/// Resolve the per-user diagnostic log path (`~/.hstray.log`).
pub fn log_file_path() -> Result<PathBuf, std::env::VarError> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(LOG_FILE_NAME))
}

/// Initialize logging infrastructure
///
/// Under systemd the journal is used. Otherwise events are appended to the
/// per-user log file and mirrored to stderr. The log is diagnostic only and
/// is never read back by the program.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            // We're running under systemd, use journal logging
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(tracing_subscriber::filter::LevelFilter::INFO)
                .init();
            return Ok(());
        }
    }

    let path = log_file_path()?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Arc::new(file)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    Ok(())
}
