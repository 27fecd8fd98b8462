//! # Console Data Transfer Objects

use auth::Permission;
use serde::Serialize;

use super::teams::TeamSummary;

/// Side panel shown with every session page of a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleView {
    pub team:                  TeamSummary,
    /// Acting user holds an active membership
    pub is_member:             bool,
    /// Permissions the acting user effectively holds in the team
    pub permissions:           Vec<Permission>,
    /// Pending invites, when the user may read invites
    pub pending_invites:       Option<u64>,
    /// Pending join requests, when the user may read join requests
    pub pending_join_requests: Option<u64>,
}
