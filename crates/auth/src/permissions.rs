//! # Permission Service
//!
//! Team-scoped permission resolution. A user holds a permission in a team when
//! they have an active (non-alumni) membership in that team whose role belongs
//! to the same team and bundles the requested `(action, resource_type)` pair.
//!
//! Checks never look at ancestor or descendant teams.

use std::collections::BTreeSet;

use entity::{memberships, role_permissions, roles};
pub use entity::sea_orm_active_enums::{Action, ResourceType};
use error::{AppError, Result};
use logging::{log_integrity_violation, log_permission_check};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Iterable, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a single permission
///
/// The textual form is `resource:action`, for example `class:create` or
/// `join_request:update`. The stored form is a pair of one-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
    /// What the holder may do
    pub action:        Action,
    /// What kind of resource the action applies to
    pub resource_type: ResourceType,
}

impl Permission {
    #[must_use]
    pub const fn new(action: Action, resource_type: ResourceType) -> Self {
        Self {
            action,
            resource_type,
        }
    }

    /// Parse a permission string into a Permission
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        Some(Self::new(
            Action::from_name(action)?,
            ResourceType::from_name(resource)?,
        ))
    }

    /// Build a permission from stored one-letter codes, e.g. `('C', 'C')` for `class:create`.
    #[must_use]
    pub fn from_codes(action: char, resource_type: char) -> Option<Self> {
        Some(Self::new(
            Action::from_code(action)?,
            ResourceType::from_code(resource_type)?,
        ))
    }

    /// Every action on every resource type.
    #[must_use]
    pub fn all() -> Vec<Self> {
        ResourceType::iter()
            .flat_map(|resource_type| Action::iter().map(move |action| Self::new(action, resource_type)))
            .collect()
    }

    /// Every action on one resource type.
    #[must_use]
    pub fn all_for(resource_type: ResourceType) -> Vec<Self> {
        Action::iter()
            .map(|action| Self::new(action, resource_type))
            .collect()
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.action)
    }
}

impl std::str::FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s).ok_or_else(|| AppError::bad_request(format!("Unknown permission '{}'", s)))
    }
}

/// Permission check result
///
/// Every deny carries its reason so it can be logged; none of them is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionCheckResult {
    /// User has the permission
    Allowed,
    /// User has no membership in the team, or the team does not exist
    NotMember,
    /// User's membership is flagged alumni
    Alumni,
    /// Membership carries no role usable in this team
    NoRole,
    /// Role does not bundle the permission
    MissingPermission,
}

impl PermissionCheckResult {
    #[must_use]
    pub fn is_allowed(&self) -> bool { matches!(self, PermissionCheckResult::Allowed) }

    /// Short reason used in logs and error messages.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            PermissionCheckResult::Allowed => "allowed",
            PermissionCheckResult::NotMember => "not_member",
            PermissionCheckResult::Alumni => "alumni",
            PermissionCheckResult::NoRole => "no_role",
            PermissionCheckResult::MissingPermission => "missing_permission",
        }
    }
}

impl std::fmt::Display for PermissionCheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.reason()) }
}

/// The membership that speaks for a user in a team.
///
/// Nothing stops a user from holding several rows for the same team. An
/// active row is preferred over an alumni one, then the oldest row wins.
pub async fn current_membership<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    user_id: Uuid,
) -> Result<Option<memberships::Model>> {
    Ok(memberships::Entity::find()
        .filter(memberships::Column::TeamId.eq(team_id))
        .filter(memberships::Column::UserId.eq(user_id))
        .order_by_asc(memberships::Column::Alumni)
        .order_by_asc(memberships::Column::CreatedAt)
        .one(conn)
        .await?)
}

/// Find the role a user may act through in a team.
///
/// Returns the deny reason when there is none.
async fn active_role<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    team_id: Uuid,
) -> Result<std::result::Result<roles::Model, PermissionCheckResult>> {
    let membership = match current_membership(conn, team_id, user_id).await? {
        Some(membership) => membership,
        None => return Ok(Err(PermissionCheckResult::NotMember)),
    };
    if membership.alumni {
        return Ok(Err(PermissionCheckResult::Alumni));
    }
    let role_id = match membership.role_id {
        Some(role_id) => role_id,
        None => return Ok(Err(PermissionCheckResult::NoRole)),
    };

    match roles::Entity::find_by_id(role_id).one(conn).await? {
        Some(role) if role.team_id == team_id => Ok(Ok(role)),
        Some(role) => {
            log_integrity_violation!(
                "membership",
                membership.id,
                format!("role {} belongs to team {}, not {}", role.id, role.team_id, team_id)
            );
            Ok(Err(PermissionCheckResult::NoRole))
        },
        None => Ok(Err(PermissionCheckResult::NoRole)),
    }
}

/// Check a permission and report why it was denied.
///
/// # Arguments
///
/// * `conn` - Database connection or open transaction
/// * `user_id` - The user to check
/// * `team_id` - The team the permission is scoped to
/// * `permission` - The permission to check
pub async fn check_permission<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    team_id: Uuid,
    permission: Permission,
) -> Result<PermissionCheckResult> {
    let result = match active_role(conn, user_id, team_id).await? {
        Ok(role) => {
            let grant = role_permissions::Entity::find()
                .filter(role_permissions::Column::RoleId.eq(role.id))
                .filter(role_permissions::Column::Action.eq(permission.action))
                .filter(role_permissions::Column::ResourceType.eq(permission.resource_type))
                .one(conn)
                .await?;
            if grant.is_some() {
                PermissionCheckResult::Allowed
            }
            else {
                PermissionCheckResult::MissingPermission
            }
        },
        Err(denied) => denied,
    };

    log_permission_check!(user_id, team_id, permission, result);
    Ok(result)
}

/// Decide whether a user may perform `action` on `resource_type` in a team.
///
/// A team that does not exist simply yields `false`.
pub async fn has_perm<C: ConnectionTrait>(
    conn: &C,
    action: Action,
    resource_type: ResourceType,
    user_id: Uuid,
    team_id: Uuid,
) -> Result<bool> {
    let result = check_permission(conn, user_id, team_id, Permission::new(action, resource_type)).await?;
    Ok(result.is_allowed())
}

/// Check whether a user holds at least one of the given permissions.
///
/// Returns the deny reason of the last permission checked when none is held.
pub async fn check_any_permission<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    team_id: Uuid,
    permissions: &[Permission],
) -> Result<PermissionCheckResult> {
    let mut last = PermissionCheckResult::MissingPermission;
    for permission in permissions {
        last = check_permission(conn, user_id, team_id, *permission).await?;
        match last {
            PermissionCheckResult::Allowed => return Ok(last),
            // Membership-level denials apply to every permission alike.
            PermissionCheckResult::NotMember | PermissionCheckResult::Alumni | PermissionCheckResult::NoRole => {
                return Ok(last)
            },
            PermissionCheckResult::MissingPermission => {},
        }
    }
    Ok(last)
}

/// Check a permission and return a forbidden error if it is not held.
///
/// # Example
/// ```ignore
/// require_permission(&txn, user.id, team_id, Permission::new(Action::Create, ResourceType::Class)).await?;
/// // Continue with the operation
/// ```
pub async fn require_permission<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    team_id: Uuid,
    permission: Permission,
) -> Result<()> {
    match check_permission(conn, user_id, team_id, permission).await? {
        PermissionCheckResult::Allowed => Ok(()),
        denied => {
            Err(AppError::forbidden(format!(
                "Permission {} denied in team {} ({})",
                permission, team_id, denied
            )))
        },
    }
}

/// Require at least one of the given permissions.
pub async fn require_any_permission<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    team_id: Uuid,
    permissions: &[Permission],
) -> Result<()> {
    match check_any_permission(conn, user_id, team_id, permissions).await? {
        PermissionCheckResult::Allowed => Ok(()),
        denied => {
            let names: Vec<String> = permissions.iter().map(ToString::to_string).collect();
            Err(AppError::forbidden(format!(
                "None of [{}] granted in team {} ({})",
                names.join(", "),
                team_id,
                denied
            )))
        },
    }
}

/// List the permissions a user effectively holds in a team.
///
/// Empty for non-members, alumni and members without a usable role.
pub async fn team_permissions<C: ConnectionTrait>(conn: &C, user_id: Uuid, team_id: Uuid) -> Result<BTreeSet<Permission>> {
    match active_role(conn, user_id, team_id).await? {
        Ok(role) => crate::roles::role_permissions(conn, role.id).await,
        Err(_) => Ok(BTreeSet::new()),
    }
}

/// Permission service for callers holding a connection pool
#[derive(Clone, Debug)]
pub struct PermissionService {
    /// Database connection
    db: sea_orm::DbConn,
}

impl PermissionService {
    /// Create a new permission service
    #[must_use]
    pub fn new(db: sea_orm::DbConn) -> Self {
        Self {
            db,
        }
    }

    pub async fn has_perm(&self, action: Action, resource_type: ResourceType, user_id: Uuid, team_id: Uuid) -> Result<bool> {
        has_perm(&self.db, action, resource_type, user_id, team_id).await
    }

    pub async fn check_permission(
        &self,
        user_id: Uuid,
        team_id: Uuid,
        permission: Permission,
    ) -> Result<PermissionCheckResult> {
        check_permission(&self.db, user_id, team_id, permission).await
    }

    pub async fn check_any_permission(
        &self,
        user_id: Uuid,
        team_id: Uuid,
        permissions: &[Permission],
    ) -> Result<PermissionCheckResult> {
        check_any_permission(&self.db, user_id, team_id, permissions).await
    }

    pub async fn require_permission(&self, user_id: Uuid, team_id: Uuid, permission: Permission) -> Result<()> {
        require_permission(&self.db, user_id, team_id, permission).await
    }

    pub async fn require_any_permission(&self, user_id: Uuid, team_id: Uuid, permissions: &[Permission]) -> Result<()> {
        require_any_permission(&self.db, user_id, team_id, permissions).await
    }

    pub async fn team_permissions(&self, user_id: Uuid, team_id: Uuid) -> Result<BTreeSet<Permission>> {
        team_permissions(&self.db, user_id, team_id).await
    }
}
