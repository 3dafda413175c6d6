use std::path::PathBuf;

use anyhow::{Context, Result};
use dialysis_core::config::LoggingSettings;
use dialysis_infrastructure::DashboardPaths;
use dialysis_infrastructure::paths::LOG_FILE_PREFIX;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber writing to a daily rolling file.
///
/// `RUST_LOG` overrides the configured level. Logs never go to the terminal,
/// which belongs to the REPL. Keep the returned guard alive until exit.
pub fn init(settings: &LoggingSettings) -> Result<(WorkerGuard, PathBuf)> {
    let directory = match &settings.directory {
        Some(dir) => dir.clone(),
        None => DashboardPaths::log_dir()?,
    };
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Cannot create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::daily(&directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok((guard, directory))
}
