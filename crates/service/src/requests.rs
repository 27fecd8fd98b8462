//! # Request State Machine
//!
//! Status rules shared by invites and join requests, and the membership side
//! effect of accepting either.
//!
//! A request leaves `Pending` exactly once. Repeating the transition that was
//! already applied is a no-op; any other move out of a terminal state is a
//! conflict. Writers apply the transition with a compare-and-set update so two
//! concurrent deciders cannot both succeed.

use std::collections::HashMap;

use auth::{
    current_membership,
    roles::{find_role_by_name, MEMBER_ROLE},
};
use chrono::Utc;
use entity::{memberships, sea_orm_active_enums::RequestStatus, users};
use error::{AppError, Result};
use logging::log_integrity_violation;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

use crate::dto::UserRef;

/// What a requested transition amounts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Move from `Pending` to the target
    Apply,
    /// Already in the target state
    NoOp,
}

/// Transition rules for [`RequestStatus`]
pub trait StatusTransition {
    /// Decide whether moving to `target` is allowed.
    ///
    /// # Errors
    ///
    /// - `BadRequest` if `target` is `Pending`
    /// - `Conflict` if the request already reached the other terminal state
    fn transition(&self, target: RequestStatus) -> Result<TransitionOutcome>;
}

impl StatusTransition for RequestStatus {
    fn transition(&self, target: RequestStatus) -> Result<TransitionOutcome> {
        if !target.is_terminal() {
            return Err(AppError::bad_request("A request cannot be moved back to pending"));
        }
        match self {
            RequestStatus::Pending => Ok(TransitionOutcome::Apply),
            current if *current == target => Ok(TransitionOutcome::NoOp),
            current => {
                Err(AppError::conflict(format!(
                    "Request is already {} and cannot become {}",
                    current, target
                )))
            },
        }
    }
}

/// Effect of accepting a request on the subject's membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    /// A new membership was created
    Created,
    /// An alumni membership was made active again
    Reactivated,
    /// The user was already an active member
    AlreadyMember,
}

/// Make `user_id` an active member of `team_id`.
///
/// Never creates a second membership for the same user and team. New members
/// get the team's member role.
pub async fn ensure_membership<C: ConnectionTrait>(conn: &C, team_id: Uuid, user_id: Uuid) -> Result<MembershipOutcome> {
    let member_role = find_role_by_name(conn, team_id, MEMBER_ROLE).await?;
    if member_role.is_none() {
        log_integrity_violation!("team", team_id, "team has no member role");
    }
    let member_role_id = member_role.map(|role| role.id);

    let existing = current_membership(conn, team_id, user_id).await?;

    let outcome = match existing {
        Some(membership) if membership.alumni => {
            let keep_role = membership.role_id.is_some();
            let mut active: memberships::ActiveModel = membership.into();
            active.alumni = Set(false);
            if !keep_role {
                active.role_id = Set(member_role_id);
            }
            active.update(conn).await?;
            MembershipOutcome::Reactivated
        },
        Some(_) => MembershipOutcome::AlreadyMember,
        None => {
            memberships::ActiveModel {
                id:         Set(Uuid::new_v4()),
                team_id:    Set(team_id),
                user_id:    Set(user_id),
                role_id:    Set(member_role_id),
                alumni:     Set(false),
                created_at: Set(Utc::now()),
            }
            .insert(conn)
            .await?;
            MembershipOutcome::Created
        },
    };

    info!(team_id = %team_id, user_id = %user_id, outcome = ?outcome, "Membership ensured");
    Ok(outcome)
}

/// Whether `user_id` currently holds an active membership in `team_id`.
pub async fn is_active_member<C: ConnectionTrait>(conn: &C, team_id: Uuid, user_id: Uuid) -> Result<bool> {
    Ok(memberships::Entity::find()
        .filter(memberships::Column::TeamId.eq(team_id))
        .filter(memberships::Column::UserId.eq(user_id))
        .filter(memberships::Column::Alumni.eq(false))
        .one(conn)
        .await?
        .is_some())
}

/// Load user references for the given ids.
pub async fn load_users<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, UserRef>> {
    let ids: Vec<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let found = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(found
        .iter()
        .map(|user| (user.id, UserRef::from(user)))
        .collect())
}

/// Take a user reference out of a map built by [`load_users`].
pub(crate) fn user_ref(users: &HashMap<Uuid, UserRef>, id: Uuid) -> Result<UserRef> {
    users
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_moves_to_either_terminal() {
        assert_eq!(
            RequestStatus::Pending.transition(RequestStatus::Accepted).unwrap(),
            TransitionOutcome::Apply
        );
        assert_eq!(
            RequestStatus::Pending.transition(RequestStatus::Rejected).unwrap(),
            TransitionOutcome::Apply
        );
    }

    #[test]
    fn test_repeating_terminal_is_noop() {
        assert_eq!(
            RequestStatus::Accepted.transition(RequestStatus::Accepted).unwrap(),
            TransitionOutcome::NoOp
        );
        assert_eq!(
            RequestStatus::Rejected.transition(RequestStatus::Rejected).unwrap(),
            TransitionOutcome::NoOp
        );
    }

    #[test]
    fn test_terminal_states_are_final() {
        let err = RequestStatus::Accepted
            .transition(RequestStatus::Rejected)
            .unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
        let err = RequestStatus::Rejected
            .transition(RequestStatus::Accepted)
            .unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_back_to_pending_rejected() {
        for status in [RequestStatus::Pending, RequestStatus::Accepted, RequestStatus::Rejected] {
            let err = status.transition(RequestStatus::Pending).unwrap_err();
            assert_eq!(err.code(), "BAD_REQUEST");
        }
    }
}
