//! # Sirius Error Infrastructure
//!
//! Error types shared by the authorization core and the service layer.
//! Every variant maps onto an HTTP-style status so the rendering layer can
//! turn a failed operation into the right response without inspecting it.

pub mod traits;

use serde::Serialize;
pub use traits::{Context, ResultExt};

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Main application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound {
        message: String,
    },

    #[error("BadRequest: {message}")]
    BadRequest {
        message: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    #[error("CycleDetected: team hierarchy loops back to team {team_id}")]
    CycleDetected {
        team_id: uuid::Uuid,
    },

    #[error("Validation: {message}")]
    Validation {
        message: String,
    },

    #[error("Internal: {message}")]
    Internal {
        message: String,
    },

    #[error("Database: {message}")]
    Database {
        message: String,
    },

    #[error("Config: {message}")]
    Config {
        message: String,
    },
}

/// Serializable error payload handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// HTTP status code
    pub status:  u16,
    /// Stable machine-readable code
    pub code:    &'static str,
    /// Human-readable message
    pub message: String,
}

impl AppError {
    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl ToString) -> Self {
        Self::NotFound {
            message: resource.to_string(),
        }
    }

    /// Create a bad request error.
    #[inline]
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create an unauthorized error.
    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self {
        Self::Unauthorized {
            message: message.to_string(),
        }
    }

    /// Create a forbidden error.
    #[inline]
    pub fn forbidden(message: impl ToString) -> Self {
        Self::Forbidden {
            message: message.to_string(),
        }
    }

    /// Create a conflict error.
    #[inline]
    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict {
            message: message.to_string(),
        }
    }

    /// Create a cycle error for the team where the walk looped.
    #[inline]
    pub fn cycle_detected(team_id: uuid::Uuid) -> Self {
        Self::CycleDetected {
            team_id,
        }
    }

    /// Create a validation error.
    #[inline]
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> http::StatusCode {
        match self {
            AppError::NotFound {
                ..
            } => http::StatusCode::NOT_FOUND,
            AppError::BadRequest {
                ..
            } => http::StatusCode::BAD_REQUEST,
            AppError::Unauthorized {
                ..
            } => http::StatusCode::UNAUTHORIZED,
            AppError::Forbidden {
                ..
            } => http::StatusCode::FORBIDDEN,
            AppError::Conflict {
                ..
            } => http::StatusCode::CONFLICT,
            AppError::Validation {
                ..
            } => http::StatusCode::UNPROCESSABLE_ENTITY,
            AppError::CycleDetected {
                ..
            }
            | AppError::Internal {
                ..
            }
            | AppError::Database {
                ..
            }
            | AppError::Config {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound {
                ..
            } => "NOT_FOUND",
            AppError::BadRequest {
                ..
            } => "BAD_REQUEST",
            AppError::Unauthorized {
                ..
            } => "UNAUTHORIZED",
            AppError::Forbidden {
                ..
            } => "FORBIDDEN",
            AppError::Conflict {
                ..
            } => "CONFLICT",
            AppError::CycleDetected {
                ..
            } => "CYCLE_DETECTED",
            AppError::Validation {
                ..
            } => "VALIDATION_ERROR",
            AppError::Internal {
                ..
            } => "INTERNAL_ERROR",
            AppError::Database {
                ..
            } => "DATABASE_ERROR",
            AppError::Config {
                ..
            } => "CONFIG_ERROR",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound {
                message,
            }
            | AppError::BadRequest {
                message,
            }
            | AppError::Unauthorized {
                message,
            }
            | AppError::Forbidden {
                message,
            }
            | AppError::Conflict {
                message,
            }
            | AppError::Validation {
                message,
            }
            | AppError::Internal {
                message,
            }
            | AppError::Database {
                message,
            }
            | AppError::Config {
                message,
            } => message.clone(),
            AppError::CycleDetected {
                team_id,
            } => format!("Team hierarchy loops back to team {}", team_id),
        }
    }

    /// Build the payload the rendering layer serializes.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            status:  self.status().as_u16(),
            code:    self.code(),
            message: self.message(),
        }
    }

    /// Add context to the error.
    #[inline]
    pub fn context(self, context: impl ToString) -> Self {
        let context_msg = context.to_string();
        let prefix = |message: String| format!("{}: {}", context_msg, message);
        match self {
            AppError::NotFound {
                message,
            } => {
                Self::NotFound {
                    message: prefix(message),
                }
            },
            AppError::BadRequest {
                message,
            } => {
                Self::BadRequest {
                    message: prefix(message),
                }
            },
            AppError::Unauthorized {
                message,
            } => {
                Self::Unauthorized {
                    message: prefix(message),
                }
            },
            AppError::Forbidden {
                message,
            } => {
                Self::Forbidden {
                    message: prefix(message),
                }
            },
            AppError::Conflict {
                message,
            } => {
                Self::Conflict {
                    message: prefix(message),
                }
            },
            AppError::CycleDetected {
                ..
            } => self,
            AppError::Validation {
                message,
            } => {
                Self::Validation {
                    message: prefix(message),
                }
            },
            AppError::Internal {
                message,
            } => {
                Self::Internal {
                    message: prefix(message),
                }
            },
            AppError::Database {
                message,
            } => {
                Self::Database {
                    message: prefix(message),
                }
            },
            AppError::Config {
                message,
            } => {
                Self::Config {
                    message: prefix(message),
                }
            },
        }
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

/// Convert Sea-ORM database errors to AppError.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// Convert transaction errors to AppError.
impl From<sea_orm::TransactionError<AppError>> for AppError {
    fn from(err: sea_orm::TransactionError<AppError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db) => db.into(),
            sea_orm::TransactionError::Transaction(app) => app,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_not_found() {
        let err = AppError::not_found("Team");
        assert_eq!(err.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.to_string().contains("NotFound"));
    }

    #[test]
    fn test_error_forbidden() {
        let err = AppError::forbidden("Access denied");
        assert_eq!(err.status(), http::StatusCode::FORBIDDEN);
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[test]
    fn test_not_found_and_forbidden_are_distinct() {
        assert_ne!(
            AppError::not_found("x").status(),
            AppError::forbidden("x").status()
        );
    }

    #[test]
    fn test_error_conflict() {
        let err = AppError::conflict("Already a member");
        assert_eq!(err.status(), http::StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_error_cycle_detected() {
        let team_id = uuid::Uuid::new_v4();
        let err = AppError::cycle_detected(team_id);
        assert_eq!(err.code(), "CYCLE_DETECTED");
        assert_eq!(err.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().contains(&team_id.to_string()));
    }

    #[test]
    fn test_cycle_detected_ignores_context() {
        let team_id = uuid::Uuid::new_v4();
        let err = AppError::cycle_detected(team_id).context("Walking ancestors");
        assert!(matches!(err, AppError::CycleDetected { team_id: id } if id == team_id));
    }

    #[test]
    fn test_error_context_prefixes_message() {
        let err = AppError::not_found("Class").context("Deleting class");
        assert_eq!(err.message(), "Deleting class: Class");
    }

    #[test]
    fn test_to_body() {
        let body = AppError::bad_request("Class belongs to another team").to_body();
        assert_eq!(body.status, 400);
        assert_eq!(body.code, "BAD_REQUEST");
        assert_eq!(body.message, "Class belongs to another team");
    }

    #[test]
    fn test_from_anyhow() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_from_db_err() {
        let err: AppError = sea_orm::DbErr::RecordNotInserted.into();
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_from_transaction_error_keeps_inner() {
        let err: AppError = sea_orm::TransactionError::Transaction(AppError::forbidden("nope")).into();
        assert_eq!(err.code(), "FORBIDDEN");
    }
}
