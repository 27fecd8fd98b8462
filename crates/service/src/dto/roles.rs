//! # Role Data Transfer Objects

use auth::Permission;
use entity::roles;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to create a role
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateRoleRequest {
    /// Role name, unique within the team
    #[validate(length(
        min = 1,
        max = 100,
        message = "Role name must be between 1 and 100 characters"
    ))]
    pub name:        String,
    /// Initial permission bundle
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// A role and its bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleView {
    pub id:          Uuid,
    pub team_id:     Uuid,
    pub name:        String,
    /// Holds a single member's direct grants
    pub is_personal: bool,
    /// Bundle in `resource:action` order
    pub permissions: Vec<Permission>,
}

impl RoleView {
    pub fn new(role: &roles::Model, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            id:          role.id,
            team_id:     role.team_id,
            name:        role.name.clone(),
            is_personal: role.is_personal,
            permissions: permissions.into_iter().collect(),
        }
    }
}
