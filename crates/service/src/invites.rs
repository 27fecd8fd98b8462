//! # Invites
//!
//! A member with `(Create, Invite)` proposes that a user join the team. The
//! invitee, or a member holding `(Update, Invite)`, decides.

use auth::{has_perm, require_permission, Action, Permission, ResourceType};
use chrono::Utc;
use entity::{invites, sea_orm_active_enums::RequestStatus, teams, users};
use error::{AppError, Result};
use logging::log_transition;
use permissions_macro::with_permission;
use sea_orm::{
    sea_query::Expr,
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::requests::InviteView,
    requests::{ensure_membership, is_active_member, load_users, user_ref, StatusTransition, TransitionOutcome},
    AppState,
    AuthenticatedUser,
};

async fn invite_views<C: ConnectionTrait>(conn: &C, rows: Vec<invites::Model>) -> Result<Vec<InviteView>> {
    let users = load_users(
        conn,
        rows.iter()
            .flat_map(|invite| [invite.invited_id, invite.created_by]),
    )
    .await?;
    rows.into_iter()
        .map(|invite| {
            Ok(InviteView {
                id:          invite.id,
                team_id:     invite.team_id,
                invited:     user_ref(&users, invite.invited_id)?,
                created_by:  user_ref(&users, invite.created_by)?,
                status:      invite.status,
                created_at:  invite.created_at,
                resolved_at: invite.resolved_at,
            })
        })
        .collect()
}

async fn invite_view<C: ConnectionTrait>(conn: &C, invite: invites::Model) -> Result<InviteView> {
    invite_views(conn, vec![invite])
        .await?
        .pop()
        .ok_or_else(|| AppError::internal("Invite view missing"))
}

/// Invite a user into a team
///
/// Inviting a user who already has a pending invite to the team returns that
/// invite unchanged.
///
/// # Errors
///
/// - `NotFound` if the team or the invited user does not exist
/// - `Forbidden` without `(Create, Invite)` in the team
/// - `Conflict` if the user is already an active member
pub async fn send_invite(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    invited_id: Uuid,
) -> Result<InviteView> {
    let txn = state.db.begin().await?;

    teams::Entity::find_by_id(team_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team {} not found", team_id)))?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Create, ResourceType::Invite),
    )
    .await?;
    users::Entity::find_by_id(invited_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", invited_id)))?;

    if is_active_member(&txn, team_id, invited_id).await? {
        return Err(AppError::conflict(format!(
            "User {} is already a member of team {}",
            invited_id, team_id
        )));
    }

    let pending = invites::Entity::find()
        .filter(invites::Column::TeamId.eq(team_id))
        .filter(invites::Column::InvitedId.eq(invited_id))
        .filter(invites::Column::Status.eq(RequestStatus::Pending))
        .one(&txn)
        .await?;

    let invite = match pending {
        Some(existing) => {
            info!(invite_id = %existing.id, team_id = %team_id, "Pending invite already exists");
            existing
        },
        None => {
            let created = invites::ActiveModel {
                id:          Set(Uuid::new_v4()),
                team_id:     Set(team_id),
                invited_id:  Set(invited_id),
                created_by:  Set(user.id),
                status:      Set(RequestStatus::Pending),
                created_at:  Set(Utc::now()),
                resolved_at: Set(None),
            }
            .insert(&txn)
            .await?;
            info!(
                invite_id = %created.id,
                team_id = %team_id,
                invited_id = %invited_id,
                created_by = %user.id,
                "Invite sent"
            );
            created
        },
    };

    let view = invite_view(&txn, invite).await?;
    txn.commit().await?;
    Ok(view)
}

/// Accept an invite, making the invitee a member
pub async fn accept_invite(state: &AppState, user: &AuthenticatedUser, invite_id: Uuid) -> Result<InviteView> {
    resolve_invite(state, user, invite_id, RequestStatus::Accepted).await
}

/// Decline an invite
pub async fn decline_invite(state: &AppState, user: &AuthenticatedUser, invite_id: Uuid) -> Result<InviteView> {
    resolve_invite(state, user, invite_id, RequestStatus::Rejected).await
}

/// Move an invite out of `Pending`, with the membership side effect on accept,
/// in a single transaction.
///
/// The invited user always decides their own invite, without `invite:update`.
/// They are not a member yet and hold nothing in the team. Everyone else needs
/// that permission in the invite's team.
async fn resolve_invite(
    state: &AppState,
    user: &AuthenticatedUser,
    invite_id: Uuid,
    target: RequestStatus,
) -> Result<InviteView> {
    let txn = state.db.begin().await?;

    let invite = invites::Entity::find_by_id(invite_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invite {} not found", invite_id)))?;

    let is_invitee = invite.invited_id == user.id;
    if !is_invitee && !has_perm(&txn, Action::Update, ResourceType::Invite, user.id, invite.team_id).await? {
        return Err(AppError::forbidden(format!(
            "Only the invited user or a member with invite:update may resolve invite {}",
            invite_id
        )));
    }

    if invite.status.transition(target)? == TransitionOutcome::NoOp {
        let view = invite_view(&txn, invite).await?;
        txn.commit().await?;
        return Ok(view);
    }

    let now = Utc::now();
    let result = invites::Entity::update_many()
        .col_expr(invites::Column::Status, Expr::value(target))
        .col_expr(invites::Column::ResolvedAt, Expr::value(Some(now)))
        .filter(invites::Column::Id.eq(invite.id))
        .filter(invites::Column::Status.eq(RequestStatus::Pending))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        // Resolved by someone else since we read it.
        let current = invites::Entity::find_by_id(invite.id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invite {} not found", invite_id)))?;
        current.status.transition(target)?;
        let view = invite_view(&txn, current).await?;
        txn.commit().await?;
        return Ok(view);
    }

    if target == RequestStatus::Accepted {
        ensure_membership(&txn, invite.team_id, invite.invited_id).await?;
    }

    let updated = invites::Entity::find_by_id(invite.id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invite {} not found", invite_id)))?;
    let view = invite_view(&txn, updated).await?;
    txn.commit().await?;

    log_transition!("invite", invite_id, RequestStatus::Pending, target, user.id);
    Ok(view)
}

/// Pending invites of a team, oldest first
#[with_permission(Permission::new(Action::Read, ResourceType::Invite))]
pub async fn pending_invites(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<Vec<InviteView>> {
    let rows = invites::Entity::find()
        .filter(invites::Column::TeamId.eq(team_id))
        .filter(invites::Column::Status.eq(RequestStatus::Pending))
        .order_by_asc(invites::Column::CreatedAt)
        .all(&state.db)
        .await?;
    invite_views(&state.db, rows).await
}

/// Pending invites addressed to the acting user, newest first
pub async fn my_invites(state: &AppState, user: &AuthenticatedUser) -> Result<Vec<InviteView>> {
    let rows = invites::Entity::find()
        .filter(invites::Column::InvitedId.eq(user.id))
        .filter(invites::Column::Status.eq(RequestStatus::Pending))
        .order_by_desc(invites::Column::CreatedAt)
        .all(&state.db)
        .await?;
    invite_views(&state.db, rows).await
}
