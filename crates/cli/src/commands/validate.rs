//! # CLI Validate Command
//!
//! Configuration validation for the Sirius CLI.

use error::{AppError, Result};
use sea_orm::{ConnectOptions, Database};

use crate::config::{redact_url, DatabaseConfig};

/// Validates the database configuration, optionally connecting to it
///
/// # Errors
///
/// - `Config` if an environment variable is malformed or the URL scheme is unsupported
/// - `Database` if `connect` is set and the database cannot be reached
pub async fn validate(config: &DatabaseConfig, connect: bool) -> Result<()> {
    config.validate().map_err(|e| AppError::config(e.to_string()))?;
    logging::info!(target: "validate", url = %redact_url(&config.connection_url()), "Database URL accepted");

    if !connect {
        return Ok(());
    }

    let db = Database::connect(connect_options(config)).await?;
    db.ping().await?;
    db.close().await?;
    logging::info!(target: "validate", "Database reachable");
    Ok(())
}

/// Connection options for the configured database
pub fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(config.connection_url());
    options
        .max_connections(config.pool_size)
        .sqlx_logging(false);
    options
}
