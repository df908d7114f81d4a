//! Logging setup using the tracing ecosystem.
//!
//! Logs go to a daily rotating file, never to the terminal, since the TUI
//! owns the screen. The level comes from `RUST_LOG`, for example
//! `RUST_LOG=quickcapture=trace` to see every key the tag input handles.
//!
//! Log directory:
//! - Linux: `~/.local/share/quickcapture/logs/`
//! - macOS: `~/Library/Application Support/quickcapture/logs/`
//! - Windows: `C:\Users\<User>\AppData\Local\quickcapture\logs\`

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "quickcapture=info,warn";

/// File name prefix; the appender adds the date.
const LOG_FILE: &str = "quickcapture.log";

/// Install the global subscriber.
///
/// The returned guard flushes buffered lines when dropped, so keep it alive
/// until the app exits.
///
/// # Errors
///
/// Fails if the log directory cannot be determined or created, or if a
/// global subscriber is already installed.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "quickcapture starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");
    Ok(guard)
}

fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;
    Ok(base.join("quickcapture").join("logs"))
}

/// Log a clean shutdown.
pub fn shutdown() {
    tracing::info!("quickcapture shutting down");
}
