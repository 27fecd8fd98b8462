//! # Database Configuration
//!
//! Database configuration handling for the CLI, reading from environment variables.

/// Default pool size when `SIRIUS_DATABASE_POOL_SIZE` is unset
const DEFAULT_POOL_SIZE: u32 = 10;

/// Database configuration for CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection URL, taking precedence over the individual fields
    pub url:       Option<String>,
    /// Database host address
    pub host:      String,
    /// Database port number
    pub port:      u16,
    /// Database name
    pub database:  String,
    /// Database username
    pub username:  String,
    /// Database password
    pub password:  String,
    /// SSL mode
    pub ssl_mode:  String,
    /// Connection pool size
    pub pool_size: u32,
}

/// Errors that can occur when parsing database configuration.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseConfigError {
    /// The port number could not be parsed as a valid number.
    #[error("Invalid port number: {value}")]
    InvalidPort {
        /// The invalid port value that was provided.
        value: String,
    },

    /// The pool size could not be parsed or was zero.
    #[error("Invalid pool size: {value}")]
    InvalidPoolSize {
        /// The invalid pool size that was provided.
        value: String,
    },

    /// The connection URL uses a scheme no configured driver handles.
    #[error("Unsupported database URL scheme in '{url}' (expected postgres:// or sqlite:)")]
    UnsupportedScheme {
        /// The rejected URL with credentials removed.
        url: String,
    },
}

impl DatabaseConfig {
    /// Creates a new DatabaseConfig from environment variables.
    ///
    /// Returns `Err` if any environment variable has an invalid format.
    pub fn from_env() -> Result<Self, DatabaseConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DatabaseConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DatabaseConfigError> {
        let port_str = lookup("SIRIUS_DATABASE_PORT").unwrap_or_else(|| "5432".to_owned());
        let port = port_str.parse::<u16>().map_err(|_e| {
            DatabaseConfigError::InvalidPort {
                value: port_str.clone(),
            }
        })?;

        let pool_size = match lookup("SIRIUS_DATABASE_POOL_SIZE") {
            Some(value) => {
                match value.parse::<u32>() {
                    Ok(size) if size > 0 => size,
                    _ => {
                        return Err(DatabaseConfigError::InvalidPoolSize {
                            value,
                        })
                    },
                }
            },
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            url: lookup("SIRIUS_DATABASE_URL").filter(|url| !url.is_empty()),
            host: lookup("SIRIUS_DATABASE_HOST").unwrap_or_else(|| "localhost".to_owned()),
            port,
            database: lookup("SIRIUS_DATABASE_NAME").unwrap_or_else(|| "sirius".to_owned()),
            username: lookup("SIRIUS_DATABASE_USER").unwrap_or_else(|| "sirius".to_owned()),
            password: lookup("SIRIUS_DATABASE_PASSWORD").unwrap_or_default(),
            ssl_mode: lookup("SIRIUS_DATABASE_SSL_MODE").unwrap_or_else(|| "require".to_owned()),
            pool_size,
        })
    }

    /// The URL to connect with: the explicit one if set, otherwise built from the fields.
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => build_database_url(self),
        }
    }

    /// Check that the connection URL targets a supported backend.
    pub fn validate(&self) -> Result<(), DatabaseConfigError> {
        let url = self.connection_url();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") || url.starts_with("sqlite:") {
            return Ok(());
        }
        Err(DatabaseConfigError::UnsupportedScheme {
            url: redact_url(&url),
        })
    }
}

/// Builds the DATABASE_URL from DatabaseConfig
///
/// # Arguments
///
/// * `config` - The database configuration to use
///
/// # Returns
///
/// A PostgreSQL connection URL string.
pub fn build_database_url(config: &DatabaseConfig) -> String {
    let encoded_username = percent_encode_username_password(&config.username);
    let encoded_password = percent_encode_username_password(&config.password);
    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        encoded_username, encoded_password, config.host, config.port, config.database, config.ssl_mode
    )
}

/// Strip the userinfo part of a URL so it can be logged.
pub fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => format!("{}://***@{}", &url[.. scheme_end], &url[at + 1 ..]),
        _ => url.to_owned(),
    }
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encoding for username/password in PostgreSQL URIs.
///
/// Everything except RFC 3986 unreserved characters is encoded, byte by byte
/// of its UTF-8 form.
fn percent_encode_username_password(s: &str) -> String {
    let mut result = String::with_capacity(s.len().saturating_mul(3));
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            result.push(byte as char);
        }
        else {
            result.push('%');
            result.push(HEX[(byte >> 4) as usize] as char);
            result.push(HEX[(byte & 15) as usize] as char);
        }
    }
    result
}
