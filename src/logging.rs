//! Tracing setup for the binary.

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ChatConfig;
use crate::error::ConfigError;

const DEFAULT_LOG_FILTER: &str = "wizbot=info";
const LOG_FILE_PREFIX: &str = "wizbot.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Create `dir` and open a daily rolling, non-blocking writer inside it.
pub fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard), ConfigError> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber: stderr always, plus a rolling file when
/// `config.log_dir` is set. Keep the returned guard alive until exit so the
/// file writer flushes.
pub fn init_logging(config: &ChatConfig) -> Result<Option<WorkerGuard>, ConfigError> {
    let (file_layer, guard) = match config.log_dir.as_deref() {
        Some(dir) => {
            let (writer, guard) = file_writer(dir)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(env_filter()),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
