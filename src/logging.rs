//! Tracing setup
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! A second, ANSI-free layer writes everything at the configured level to
//! `bakr.log` in the base directory.

use std::env;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::BakrPaths;
use crate::error::{BakrError, BakrResult};

/// Environment variable holding a console filter directive
pub const LOG_ENV: &str = "BAKR_LOG";

/// Console filter used when `BAKR_LOG` is unset
const DEFAULT_CONSOLE_FILTER: &str = "warn";

/// Install the global subscriber
///
/// The returned guard flushes the file writer when dropped and must be
/// held for the life of the process.
pub fn init_logging(paths: &BakrPaths, file_level: &str) -> BakrResult<WorkerGuard> {
    paths.ensure_directories()?;

    let console_filter = match env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(&directive)
            .map_err(|e| BakrError::Config(format!("Invalid {}: {}", LOG_ENV, e)))?,
        Err(_) => EnvFilter::new(DEFAULT_CONSOLE_FILTER),
    };
    let file_filter = EnvFilter::try_new(file_level)
        .map_err(|e| BakrError::Config(format!("Invalid log level '{}': {}", file_level, e)))?;

    let file_appender = tracing_appender::rolling::never(paths.base_dir(), "bakr.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .with_ansi(true)
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .try_init()
        .map_err(|e| BakrError::Config(format!("Failed to install logger: {}", e)))?;

    tracing::debug!(log_file = %paths.log_file().display(), "Logging initialized");
    Ok(guard)
}
