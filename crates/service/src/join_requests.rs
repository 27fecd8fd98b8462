//! # Join Requests
//!
//! A user asks to enter a team. Members holding `(Update, JoinRequest)` accept
//! or decline; the requester may withdraw (decline) their own request.

use auth::{has_perm, Action, Permission, ResourceType};
use chrono::Utc;
use entity::{join_requests, sea_orm_active_enums::RequestStatus, teams};
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
    dto::requests::JoinRequestView,
    requests::{ensure_membership, is_active_member, load_users, user_ref, StatusTransition, TransitionOutcome},
    AppState,
    AuthenticatedUser,
};

async fn join_request_views<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<join_requests::Model>,
) -> Result<Vec<JoinRequestView>> {
    let users = load_users(conn, rows.iter().map(|request| request.user_id)).await?;
    rows.into_iter()
        .map(|request| {
            Ok(JoinRequestView {
                id:          request.id,
                team_id:     request.team_id,
                user:        user_ref(&users, request.user_id)?,
                status:      request.status,
                created_at:  request.created_at,
                resolved_at: request.resolved_at,
            })
        })
        .collect()
}

async fn join_request_view<C: ConnectionTrait>(conn: &C, request: join_requests::Model) -> Result<JoinRequestView> {
    join_request_views(conn, vec![request])
        .await?
        .pop()
        .ok_or_else(|| AppError::internal("Join request view missing"))
}

/// Ask to join a team as the acting user
///
/// A second request while one is pending returns the pending one unchanged.
///
/// # Errors
///
/// - `NotFound` if the team does not exist
/// - `Conflict` if the user is already an active member
pub async fn send_join_request(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<JoinRequestView> {
    let txn = state.db.begin().await?;

    teams::Entity::find_by_id(team_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team {} not found", team_id)))?;

    if is_active_member(&txn, team_id, user.id).await? {
        return Err(AppError::conflict(format!(
            "User {} is already a member of team {}",
            user.id, team_id
        )));
    }

    let pending = join_requests::Entity::find()
        .filter(join_requests::Column::TeamId.eq(team_id))
        .filter(join_requests::Column::UserId.eq(user.id))
        .filter(join_requests::Column::Status.eq(RequestStatus::Pending))
        .one(&txn)
        .await?;

    let request = match pending {
        Some(existing) => {
            info!(request_id = %existing.id, team_id = %team_id, "Pending join request already exists");
            existing
        },
        None => {
            let created = join_requests::ActiveModel {
                id:          Set(Uuid::new_v4()),
                team_id:     Set(team_id),
                user_id:     Set(user.id),
                status:      Set(RequestStatus::Pending),
                created_at:  Set(Utc::now()),
                resolved_at: Set(None),
            }
            .insert(&txn)
            .await?;
            info!(request_id = %created.id, team_id = %team_id, user_id = %user.id, "Join request sent");
            created
        },
    };

    let view = join_request_view(&txn, request).await?;
    txn.commit().await?;
    Ok(view)
}

/// Accept a join request, making the requester a member
pub async fn accept_join_request(
    state: &AppState,
    user: &AuthenticatedUser,
    request_id: Uuid,
) -> Result<JoinRequestView> {
    resolve_join_request(state, user, request_id, RequestStatus::Accepted).await
}

/// Decline a join request, or withdraw one's own
pub async fn decline_join_request(
    state: &AppState,
    user: &AuthenticatedUser,
    request_id: Uuid,
) -> Result<JoinRequestView> {
    resolve_join_request(state, user, request_id, RequestStatus::Rejected).await
}

async fn resolve_join_request(
    state: &AppState,
    user: &AuthenticatedUser,
    request_id: Uuid,
    target: RequestStatus,
) -> Result<JoinRequestView> {
    let txn = state.db.begin().await?;

    let request = join_requests::Entity::find_by_id(request_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Join request {} not found", request_id)))?;

    let withdrawing = target == RequestStatus::Rejected && request.user_id == user.id;
    if !withdrawing && !has_perm(&txn, Action::Update, ResourceType::JoinRequest, user.id, request.team_id).await? {
        return Err(AppError::forbidden(format!(
            "Permission join_request:update required to resolve join request {}",
            request_id
        )));
    }

    if request.status.transition(target)? == TransitionOutcome::NoOp {
        let view = join_request_view(&txn, request).await?;
        txn.commit().await?;
        return Ok(view);
    }

    let result = join_requests::Entity::update_many()
        .col_expr(join_requests::Column::Status, Expr::value(target))
        .col_expr(join_requests::Column::ResolvedAt, Expr::value(Some(Utc::now())))
        .filter(join_requests::Column::Id.eq(request.id))
        .filter(join_requests::Column::Status.eq(RequestStatus::Pending))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        // Resolved by someone else since we read it.
        let current = join_requests::Entity::find_by_id(request.id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Join request {} not found", request_id)))?;
        current.status.transition(target)?;
        let view = join_request_view(&txn, current).await?;
        txn.commit().await?;
        return Ok(view);
    }

    if target == RequestStatus::Accepted {
        ensure_membership(&txn, request.team_id, request.user_id).await?;
    }

    let updated = join_requests::Entity::find_by_id(request.id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Join request {} not found", request_id)))?;
    let view = join_request_view(&txn, updated).await?;
    txn.commit().await?;

    log_transition!("join_request", request_id, RequestStatus::Pending, target, user.id);
    Ok(view)
}

/// Pending join requests of a team, oldest first
#[with_permission(Permission::new(Action::Read, ResourceType::JoinRequest))]
pub async fn pending_join_requests(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
) -> Result<Vec<JoinRequestView>> {
    let rows = join_requests::Entity::find()
        .filter(join_requests::Column::TeamId.eq(team_id))
        .filter(join_requests::Column::Status.eq(RequestStatus::Pending))
        .order_by_asc(join_requests::Column::CreatedAt)
        .all(&state.db)
        .await?;
    join_request_views(&state.db, rows).await
}

/// The acting user's own join requests, newest first
pub async fn my_join_requests(state: &AppState, user: &AuthenticatedUser) -> Result<Vec<JoinRequestView>> {
    let rows = join_requests::Entity::find()
        .filter(join_requests::Column::UserId.eq(user.id))
        .order_by_desc(join_requests::Column::CreatedAt)
        .all(&state.db)
        .await?;
    join_request_views(&state.db, rows).await
}
