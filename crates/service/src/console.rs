//! # Console
//!
//! Builds the per-team side panel: the team, what the acting user may do
//! there, and counters for pending proposals the user is allowed to see.

use auth::{has_perm, team_permissions, Action, ResourceType};
use entity::{invites, join_requests, memberships, sea_orm_active_enums::RequestStatus, teams};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    dto::{console::ConsoleView, teams::TeamSummary},
    AppState,
    AuthenticatedUser,
};

/// Build the console for `user_id` in `team_id`.
pub async fn console_view<C: ConnectionTrait>(conn: &C, user_id: Uuid, team_id: Uuid) -> Result<ConsoleView> {
    let team = teams::Entity::find_by_id(team_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team {} not found", team_id)))?;

    let is_member = memberships::Entity::find()
        .filter(memberships::Column::TeamId.eq(team_id))
        .filter(memberships::Column::UserId.eq(user_id))
        .filter(memberships::Column::Alumni.eq(false))
        .one(conn)
        .await?
        .is_some();

    let pending_invites = if has_perm(conn, Action::Read, ResourceType::Invite, user_id, team_id).await? {
        Some(
            invites::Entity::find()
                .filter(invites::Column::TeamId.eq(team_id))
                .filter(invites::Column::Status.eq(RequestStatus::Pending))
                .count(conn)
                .await?,
        )
    }
    else {
        None
    };

    let pending_join_requests = if has_perm(conn, Action::Read, ResourceType::JoinRequest, user_id, team_id).await? {
        Some(
            join_requests::Entity::find()
                .filter(join_requests::Column::TeamId.eq(team_id))
                .filter(join_requests::Column::Status.eq(RequestStatus::Pending))
                .count(conn)
                .await?,
        )
    }
    else {
        None
    };

    Ok(ConsoleView {
        team: TeamSummary::from(&team),
        is_member,
        permissions: team_permissions(conn, user_id, team_id)
            .await?
            .into_iter()
            .collect(),
        pending_invites,
        pending_join_requests,
    })
}

/// Console for the acting user.
pub async fn console(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<ConsoleView> {
    console_view(&state.db, user.id, team_id).await
}
