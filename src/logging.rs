//! Logging setup for the command-line tool.
//!
//! Console output always; optionally two daily-rotating files in the log
//! directory (`inflight-clean.*.log` with everything, `error.*.log` with
//! warnings and errors).
//!
//! ```no_run
//! use inflight_clean::{config::LoggingConfig, logging};
//!
//! logging::init(&LoggingConfig::default()).expect("Failed to initialize logging");
//! tracing::info!("pipeline started");
//! ```

use crate::config::{APP_DIR, LoggingConfig};
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Resolves the log directory, creating it if needed.
///
/// Defaults to `<data dir>/inflight-clean/logs`.
///
/// # Errors
///
/// Returns an error if no data directory exists or it cannot be created.
pub fn get_log_dir(config: &LoggingConfig) -> Result<PathBuf> {
    let log_dir = match &config.directory {
        Some(dir) => dir.clone(),
        None => dirs::data_dir()
            .context("Failed to determine data directory")?
            .join(APP_DIR)
            .join("logs"),
    };

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

fn appender(log_dir: &std::path::Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Failed to create {prefix} file appender"))
}

/// Installs the global subscriber. `RUST_LOG` overrides `config.level`.
///
/// # Errors
///
/// Returns error if the filter is invalid or file appenders cannot be created.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Failed to create env filter")?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let (all_logs_layer, error_logs_layer, log_dir) = if config.file_output {
        let log_dir = get_log_dir(config)?;
        let all_logs = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(appender(&log_dir, APP_DIR)?);
        let error_logs = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(appender(&log_dir, "error")?)
            .with_filter(EnvFilter::new("warn"));
        (Some(all_logs), Some(error_logs), Some(log_dir))
    } else {
        (None, None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = log_dir {
        tracing::debug!("Logging initialized, log directory: {}", dir.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_log_dir_honours_override() {
        let tmp = tempfile::tempdir().expect("Failed to create temp dir");
        let config = LoggingConfig {
            directory: Some(tmp.path().join("logs")),
            ..Default::default()
        };
        let log_dir = get_log_dir(&config).expect("Failed to get log dir");
        assert!(log_dir.ends_with("logs"));
        assert!(log_dir.exists());
    }
}
