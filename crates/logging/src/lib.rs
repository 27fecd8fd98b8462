//! # Sirius Logging Infrastructure
//!
//! Structured logging utilities for the Sirius workspace.
//! Provides tracing integration with JSON output and environment-based configuration.

pub mod config;
pub mod macros;

pub use config::{LoggingConfig, LoggingGuard};
// Re-export tracing macros
pub use tracing::{debug, error, info, trace, warn};

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Log level (debug, info, warn, error)
/// * `format` - Output format (json, pretty, compact)
/// * `log_file` - Optional path to log file
///
/// The returned guard flushes the file writer when dropped and must be kept
/// alive for the lifetime of the process.
pub fn init(
    level: &str,
    format: &str,
    log_file: Option<&str>,
) -> Result<LoggingGuard, tracing::subscriber::SetGlobalDefaultError> {
    let config = LoggingConfig::from_env(level, format, log_file);
    init_with_config(config)
}

/// Initialize logging with a custom configuration.
pub fn init_with_config(config: LoggingConfig) -> Result<LoggingGuard, tracing::subscriber::SetGlobalDefaultError> {
    let (subscriber, guard) = config.build();
    tracing::subscriber::set_global_default(subscriber)?;
    info!(level = %config.level, format = %config.format, environment = %config.environment, "Logging initialized");
    Ok(guard)
}
