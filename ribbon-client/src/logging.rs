//! Logging setup for applications embedding the client.
//!
//! The client emits `tracing` events for every request and session
//! transition but installs no subscriber of its own. Applications that want
//! those events on stderr can initialize one here; libraries and callers
//! with their own subscriber should skip this module entirely.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// How much the installed subscriber reports
#[derive(Debug, Clone, Copy)]
pub enum LoggingMode {
    /// No subscriber, all events are dropped
    Silent,
    /// Compact stderr output at info level
    Development,
    /// Verbose stderr output with source locations at debug level
    Debug,
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Install a global subscriber for the given mode.
///
/// Call this once, early, before the first [`SbcClient`](crate::SbcClient)
/// call. Initializing twice fails with [`LoggingError::TracingInit`].
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let subscriber = Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(env_filter("info"));

            subscriber
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let subscriber = Registry::default()
                .with(fmt::layer().pretty().with_file(true).with_line_number(true))
                .with(env_filter("debug"));

            subscriber
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Install a subscriber according to the `RIBBON_LOG_MODE` environment
/// variable: `development`, `debug`, or anything else for silent.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var("RIBBON_LOG_MODE").as_deref() {
        Ok("development") => LoggingMode::Development,
        Ok("debug") => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    };

    init_logging(mode)
}

/// Whether a global subscriber has already been installed.
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

/// Level filter from `RIBBON_LOG_LEVEL`, then `RUST_LOG`, then the default.
fn env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var("RIBBON_LOG_LEVEL") {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_level)
    }
}
