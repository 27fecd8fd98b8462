//! # Sirius Service Layer
//!
//! Request-scoped operations for team management built on the authorization
//! core. Every operation takes the acting user and returns a serializable view
//! model or a typed [`error::AppError`]; rendering and routing live elsewhere.
//!
//! ## Modules
//!
//! - [`teams`]: Team creation, info, membership and hierarchy changes
//! - [`roles`]: Role bundles and direct grants
//! - [`invites`] / [`join_requests`]: Proposal flows built on [`requests`]
//! - [`session`]: Classes, events and notices
//! - [`console`]: Per-team console data attached to session views
//! - [`dto`]: Request and view types

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub mod console;
pub mod dto;
pub mod invites;
pub mod join_requests;
pub mod requests;
pub mod roles;
pub mod session;
pub mod teams;

/// Application state shared across operations
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: sea_orm::DbConn,
}

impl AppState {
    #[must_use]
    pub fn new(db: sea_orm::DbConn) -> Self {
        Self {
            db,
        }
    }
}

/// Identity of the acting user, supplied by the external identity subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User ID
    pub id:    Uuid,
    /// User email
    pub email: String,
}

impl From<&entity::users::Model> for AuthenticatedUser {
    fn from(user: &entity::users::Model) -> Self {
        Self {
            id:    user.id,
            email: user.email.clone(),
        }
    }
}

/// Run the derived field checks of a request type
pub(crate) fn validate_request<T: Validate>(req: &T) -> error::Result<()> {
    req.validate().map_err(|e| {
        error::AppError::Validation {
            message: e.to_string(),
        }
    })
}
