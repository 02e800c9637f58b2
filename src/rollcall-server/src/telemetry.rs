//! Structured logging with file output
//!
//! - JSON formatted logs to file
//! - Console output for development
//! - Size-based and daily rotation (see [`LogConfig`])

use anyhow::Result;
use rolling_file::{RollingConditionBasic, RollingFileAppender};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use rollcall_core::config::LogConfig;

const DEFAULT_FILTER: &str = "rollcall_server=debug,rollcall_core=debug,actix_web=info";

fn max_file_bytes(config: &LogConfig) -> u64 {
    config.max_file_size_mb.saturating_mul(1024 * 1024)
}

/// Initialize tracing with file logging
///
/// Returns a guard that must be kept alive to ensure logs are flushed
pub fn init_telemetry(config: &LogConfig) -> Result<WorkerGuard> {
    let log_dir = Path::new(&config.dir);
    std::fs::create_dir_all(log_dir)?;

    // Rotates when the file reaches max size or daily, whichever comes first
    let file_appender = RollingFileAppender::new(
        log_dir.join(&config.file_name),
        RollingConditionBasic::new()
            .daily()
            .max_size(max_file_bytes(config)),
        config.max_files,
    )?;

    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_target(true)
        .with_thread_ids(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    tracing::info!(dir = ?log_dir, file = %config.file_name, "Telemetry initialized");

    Ok(guard)
}
