//! # Invite and Join Request Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::RequestStatus;
use serde::Serialize;
use uuid::Uuid;

use super::UserRef;

/// An invite as shown to the team and to the invitee
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteView {
    pub id:          Uuid,
    pub team_id:     Uuid,
    /// User being invited
    pub invited:     UserRef,
    /// Member who sent the invite
    pub created_by:  UserRef,
    pub status:      RequestStatus,
    pub created_at:  DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// A join request as shown to the team and to the requester
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinRequestView {
    pub id:          Uuid,
    pub team_id:     Uuid,
    /// User asking to join
    pub user:        UserRef,
    pub status:      RequestStatus,
    pub created_at:  DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
