//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber: an `EnvFilter` built from
//! the configured level and a `fmt` layer writing either to stderr or to a
//! rotating log file.

use super::file_writer::FileWriter;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber.
///
/// # Trace Level Resolution
///
/// Level is determined by:
/// 1. `RUST_LOG` environment variable, when set and valid
/// 2. `config.trace_level`
/// 3. Default: `"info"`
///
/// # Output
///
/// With `config.log_file` set, events go to that file through a
/// [`FileWriter`] (10 MB rotation, 3 backups). Otherwise they go to stderr,
/// so they never mix with a display printed to stdout.
///
/// # Initialization Behavior
///
/// Idempotent: only the first call installs a subscriber, later calls and
/// failures are ignored. Logging is never a reason to stop the menu.
///
/// # Example
///
/// ```rust
/// use lcdmenu::observability::init_tracing;
/// use lcdmenu::Config;
///
/// let config = Config {
///     trace_level: "debug".to_string(),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.trace_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match &config.log_file {
        Some(path) => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_thread_names(true)
                    .with_writer(FileWriter::new(path)),
            )
            .try_init(),
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(
            level = %config.trace_level,
            log_file = ?config.log_file,
            "tracing initialized"
        );
    }
}
