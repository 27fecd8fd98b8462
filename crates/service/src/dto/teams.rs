//! # Team Data Transfer Objects
//!
//! Request and view types for team management operations.

use chrono::{DateTime, Utc};
use entity::teams;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::UserRef;

/// Request to create a new team
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Team name must be between 1 and 255 characters"
    ))]
    pub name:           String,
    /// Team description
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description:    Option<String>,
    /// Optional parent team ID for hierarchical teams
    pub parent_team_id: Option<Uuid>,
}

/// Request to move a team within the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReparentTeamRequest {
    /// New parent, or `None` to make the team a root team
    pub parent_team_id: Option<Uuid>,
}

/// Summary of a single team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamSummary {
    /// Team's unique identifier
    pub id:             Uuid,
    /// Team name
    pub name:           String,
    /// Team description
    pub description:    Option<String>,
    /// Parent team ID for hierarchical teams
    pub parent_team_id: Option<Uuid>,
    /// Creation timestamp
    pub created_at:     DateTime<Utc>,
}

impl From<&teams::Model> for TeamSummary {
    fn from(team: &teams::Model) -> Self {
        Self {
            id:             team.id,
            name:           team.name.clone(),
            description:    team.description.clone(),
            parent_team_id: team.parent_team_id,
            created_at:     team.created_at,
        }
    }
}

/// Name and id of a related team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRef {
    pub id:   Uuid,
    pub name: String,
}

impl From<&teams::Model> for TeamRef {
    fn from(team: &teams::Model) -> Self {
        Self {
            id:   team.id,
            name: team.name.clone(),
        }
    }
}

/// A team member as shown on the team page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberView {
    /// The member
    pub user:       UserRef,
    /// Role ID, if the member has one
    pub role_id:    Option<Uuid>,
    /// Role name, if the member has one
    pub role_name:  Option<String>,
    /// Former member
    pub alumni:     bool,
    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Team page: the team, its ancestors, sub-teams and members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamInfoView {
    pub team:     TeamSummary,
    /// Immediate parent first, root last
    pub parents:  Vec<TeamRef>,
    /// Direct sub-teams ordered by name
    pub children: Vec<TeamRef>,
    /// Members ordered by join date
    pub members:  Vec<MemberView>,
}
