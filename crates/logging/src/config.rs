//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Boxed subscriber produced by [`LoggingConfig::build`].
pub type BoxedSubscriber = Box<dyn tracing::Subscriber + Send + Sync>;

/// Keeps the non-blocking file writer alive.
#[derive(Debug, Default)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level or filter directives (e.g. `info`, `auth=debug,info`)
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path
    #[serde(default)]
    pub log_file: Option<String>,

    /// Environment (development, testing, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_level() -> String { "info".to_string() }

fn default_format() -> String { "compact".to_string() }

fn default_environment() -> String { "development".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:       default_level(),
            format:      default_format(),
            log_file:    None,
            environment: default_environment(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables, falling back to the given values.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level:       std::env::var("RUST_LOG")
                .ok()
                .unwrap_or_else(|| level.to_string()),
            format:      std::env::var("SIRIUS_LOG_FORMAT")
                .ok()
                .unwrap_or_else(|| format.to_string()),
            log_file:    std::env::var("SIRIUS_LOG_FILE")
                .ok()
                .or(log_file.map(|s| s.to_string())),
            environment: std::env::var("SIRIUS_ENV").unwrap_or_else(|_| default_environment()),
        }
    }

    fn filter(&self) -> EnvFilter { EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info")) }

    /// Build the tracing subscriber from this configuration.
    ///
    /// Unknown formats fall back to JSON.
    pub fn build(&self) -> (BoxedSubscriber, LoggingGuard) {
        match self.format.as_str() {
            "pretty" => (self.build_pretty_subscriber(), LoggingGuard::default()),
            "compact" => (self.build_compact_subscriber(), LoggingGuard::default()),
            _ => self.build_json_subscriber(),
        }
    }

    /// Build a JSON subscriber for production logging, optionally mirrored to an hourly rolling file.
    fn build_json_subscriber(&self) -> (BoxedSubscriber, LoggingGuard) {
        let stdout_layer = fmt::layer()
            .json()
            .with_timer(fmt::time::UtcTime::rfc_3339());

        match self.log_file {
            Some(ref log_file) => {
                let path = Path::new(log_file);
                let directory = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let file_name = path.file_name().unwrap_or_default();
                let file_appender = tracing_appender::rolling::hourly(directory, file_name);
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = fmt::layer().json().with_writer(non_blocking);
                let subscriber = Registry::default()
                    .with(self.filter())
                    .with(stdout_layer)
                    .with(file_layer);
                (
                    Box::new(subscriber),
                    LoggingGuard {
                        _file: Some(guard),
                    },
                )
            },
            None => {
                (
                    Box::new(Registry::default().with(self.filter()).with(stdout_layer)),
                    LoggingGuard::default(),
                )
            },
        }
    }

    /// Build a pretty subscriber for development logging.
    fn build_pretty_subscriber(&self) -> BoxedSubscriber {
        let layer = fmt::layer()
            .pretty()
            .with_timer(fmt::time::UtcTime::rfc_3339());
        Box::new(Registry::default().with(self.filter()).with(layer))
    }

    /// Build a compact subscriber for the CLI and tests.
    fn build_compact_subscriber(&self) -> BoxedSubscriber {
        let layer = fmt::layer()
            .compact()
            .with_timer(fmt::time::UtcTime::rfc_3339());
        Box::new(Registry::default().with(self.filter()).with(layer))
    }
}
