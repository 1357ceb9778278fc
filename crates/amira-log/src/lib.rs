//! Structured logging for the AMIRA scenario tools.
//!
//! Installs a `tracing` subscriber with console output and optional JSON file
//! logging. Records emitted through the `log` facade (as the config loader
//! does) are forwarded into the same subscriber.

use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written into `log_dir`.
pub const LOG_FILE_NAME: &str = "amira.log";

/// Resolve the filter string: an explicit non-empty level wins over the default.
pub fn filter_directive(level: Option<&str>) -> String {
    match level {
        Some(level) if !level.trim().is_empty() => level.trim().to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// - Console output with uptime timestamps, module paths, and levels
/// - `RUST_LOG` takes precedence over `level`
/// - With `log_dir`, a JSON copy of every record goes to `log_dir/amira.log`
///
/// # Examples
///
/// ```no_run
/// use amira_log::init_logging;
///
/// init_logging(None, None);
/// ```
///
/// ```no_run
/// // Verbose, with a JSON log for later inspection
/// amira_log::init_logging(Some("debug"), Some(std::path::Path::new("./logs")));
/// ```
pub fn init_logging(level: Option<&str>, log_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// An `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
