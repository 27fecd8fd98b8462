//! # Session Resources
//!
//! Classes, events and notices scoped to a team. Every operation checks the
//! permission on the requested team first, then loads the resource, then
//! rejects resources that belong to a different team.

pub mod classes;
pub mod events;
pub mod notices;

use error::{AppError, Result};
use uuid::Uuid;

/// Reject a resource that was addressed through a team it does not belong to.
pub(crate) fn ensure_same_team(kind: &str, resource_id: Uuid, resource_team_id: Uuid, team_id: Uuid) -> Result<()> {
    if resource_team_id != team_id {
        return Err(AppError::bad_request(format!(
            "{} {} does not belong to team {}",
            kind, resource_id, team_id
        )));
    }
    Ok(())
}

/// Trimmed, non-empty title.
pub(crate) fn require_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title must not be empty"));
    }
    Ok(title.to_string())
}
