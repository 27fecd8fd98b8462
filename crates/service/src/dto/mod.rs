//! # Data Transfer Objects Module
//!
//! Request types accepted by service operations and the view models they
//! hand to the rendering layer.

pub mod console;
pub mod requests;
pub mod roles;
pub mod session;
pub mod teams;

use entity::users;
use serde::Serialize;
use uuid::Uuid;

/// Minimal user reference shown next to members, invites and requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRef {
    /// User's unique identifier
    pub id:         Uuid,
    /// User's email
    pub email:      String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name:  String,
}

impl From<&users::Model> for UserRef {
    fn from(user: &users::Model) -> Self {
        Self {
            id:         user.id,
            email:      user.email.clone(),
            first_name: user.first_name.clone(),
            last_name:  user.last_name.clone(),
        }
    }
}
