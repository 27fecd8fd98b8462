//! # Team Hierarchy
//!
//! Walks the `parent_team_id` chain. The store does not enforce acyclicity, so
//! every walk keeps a visited set and a depth bound and fails instead of looping.

use std::collections::HashSet;

use entity::teams;
use error::{AppError, Result};
use logging::log_integrity_violation;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

/// Longest ancestor chain accepted before the walk gives up.
pub const MAX_TEAM_DEPTH: usize = 64;

async fn find_team<C: ConnectionTrait>(conn: &C, team_id: Uuid) -> Result<teams::Model> {
    teams::Entity::find_by_id(team_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team {} not found", team_id)))
}

/// Produce the ancestors of a team, immediate parent first and root last.
///
/// # Errors
///
/// - `NotFound` if the team, or any team its chain points at, does not exist
/// - `CycleDetected` if the chain revisits a team
/// - `Internal` if the chain is longer than [`MAX_TEAM_DEPTH`]
pub async fn ancestors<C: ConnectionTrait>(conn: &C, team_id: Uuid) -> Result<Vec<teams::Model>> {
    let start = find_team(conn, team_id).await?;

    let mut visited = HashSet::from([start.id]);
    let mut chain = Vec::new();
    let mut next = start.parent_team_id;

    while let Some(parent_id) = next {
        if !visited.insert(parent_id) {
            log_integrity_violation!("team", team_id, format!("ancestor chain loops at team {}", parent_id));
            return Err(AppError::cycle_detected(parent_id));
        }
        if chain.len() >= MAX_TEAM_DEPTH {
            log_integrity_violation!("team", team_id, "ancestor chain exceeds maximum depth");
            return Err(AppError::internal(format!(
                "Team {} has more than {} ancestors",
                team_id, MAX_TEAM_DEPTH
            )));
        }

        let parent = teams::Entity::find_by_id(parent_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Parent team {} referenced in the chain of team {} not found",
                    parent_id, team_id
                ))
            })?;
        next = parent.parent_team_id;
        chain.push(parent);
    }

    Ok(chain)
}

/// Direct sub-teams of a team, ordered by name.
pub async fn children<C: ConnectionTrait>(conn: &C, team_id: Uuid) -> Result<Vec<teams::Model>> {
    Ok(teams::Entity::find()
        .filter(teams::Column::ParentTeamId.eq(team_id))
        .order_by_asc(teams::Column::Name)
        .all(conn)
        .await?)
}

/// Check that `team_id` may be moved under `new_parent_id`.
///
/// Moving to the root (`None`) is always allowed. Moving under itself or under
/// one of its own descendants is a `BadRequest`.
pub async fn ensure_can_reparent<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    new_parent_id: Option<Uuid>,
) -> Result<()> {
    let new_parent_id = match new_parent_id {
        Some(id) => id,
        None => return Ok(()),
    };
    if new_parent_id == team_id {
        return Err(AppError::bad_request("A team cannot be its own parent"));
    }

    let parent_chain = ancestors(conn, new_parent_id).await?;
    if parent_chain.iter().any(|team| team.id == team_id) {
        return Err(AppError::bad_request(format!(
            "Team {} is an ancestor of team {}",
            team_id, new_parent_id
        )));
    }
    Ok(())
}
