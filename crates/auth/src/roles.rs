//! # Role Service
//!
//! Creates roles, edits their permission bundles and moves members between
//! them. Every function takes any connection so it can run inside the
//! caller's transaction.

use std::collections::BTreeSet;

use chrono::Utc;
use entity::{memberships, role_permissions, roles};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;

use crate::permissions::{current_membership, Action, Permission, ResourceType};

/// Role given to a team's creator.
pub const ADMIN_ROLE: &str = "Admin";
/// Role given to users joining through an invite or join request.
pub const MEMBER_ROLE: &str = "Member";

/// Bundle of the admin role: everything.
#[must_use]
pub fn admin_permissions() -> Vec<Permission> { Permission::all() }

/// Bundle of the member role: read access to the team and its session resources.
#[must_use]
pub fn member_permissions() -> Vec<Permission> {
    [
        ResourceType::Team,
        ResourceType::Class,
        ResourceType::Event,
        ResourceType::Notice,
    ]
    .into_iter()
    .map(|resource_type| Permission::new(Action::Read, resource_type))
    .collect()
}

/// Find a role by name within a team.
pub async fn find_role_by_name<C: ConnectionTrait>(conn: &C, team_id: Uuid, name: &str) -> Result<Option<roles::Model>> {
    Ok(roles::Entity::find()
        .filter(roles::Column::TeamId.eq(team_id))
        .filter(roles::Column::Name.eq(name))
        .one(conn)
        .await?)
}

/// Load a role and make sure it belongs to `team_id`.
///
/// # Errors
///
/// - `NotFound` if the role does not exist
/// - `BadRequest` if it belongs to another team
pub async fn find_team_role<C: ConnectionTrait>(conn: &C, team_id: Uuid, role_id: Uuid) -> Result<roles::Model> {
    let role = roles::Entity::find_by_id(role_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role {} not found", role_id)))?;
    if role.team_id != team_id {
        return Err(AppError::bad_request(format!(
            "Role {} does not belong to team {}",
            role_id, team_id
        )));
    }
    Ok(role)
}

/// All roles of a team ordered by name. Personal roles are included.
pub async fn team_roles<C: ConnectionTrait>(conn: &C, team_id: Uuid) -> Result<Vec<roles::Model>> {
    Ok(roles::Entity::find()
        .filter(roles::Column::TeamId.eq(team_id))
        .order_by_asc(roles::Column::Name)
        .all(conn)
        .await?)
}

/// Permission bundle of a role.
pub async fn role_permissions<C: ConnectionTrait>(conn: &C, role_id: Uuid) -> Result<BTreeSet<Permission>> {
    let rows = role_permissions::Entity::find()
        .filter(role_permissions::Column::RoleId.eq(role_id))
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| Permission::new(row.action, row.resource_type))
        .collect())
}

async fn insert_role<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    name: &str,
    is_personal: bool,
    permissions: &[Permission],
) -> Result<roles::Model> {
    if find_role_by_name(conn, team_id, name).await?.is_some() {
        return Err(AppError::conflict(format!(
            "Role '{}' already exists in team {}",
            name, team_id
        )));
    }

    let role = roles::ActiveModel {
        id:          Set(Uuid::new_v4()),
        team_id:     Set(team_id),
        name:        Set(name.to_string()),
        is_personal: Set(is_personal),
        created_at:  Set(Utc::now()),
    }
    .insert(conn)
    .await?;

    let bundle: BTreeSet<Permission> = permissions.iter().copied().collect();
    for permission in &bundle {
        grant_permission(conn, role.id, *permission).await?;
    }

    info!(
        role_id = %role.id,
        team_id = %team_id,
        name = %name,
        permissions = bundle.len(),
        "Role created"
    );
    Ok(role)
}

/// Create a named role in a team with an initial bundle.
///
/// # Errors
///
/// Returns `Conflict` if the team already has a role with this name.
pub async fn create_role<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    name: &str,
    permissions: &[Permission],
) -> Result<roles::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Role name must not be empty"));
    }
    insert_role(conn, team_id, name, false, permissions).await
}

/// Create the admin and member roles every new team starts with.
pub async fn create_default_roles<C: ConnectionTrait>(conn: &C, team_id: Uuid) -> Result<(roles::Model, roles::Model)> {
    let admin = insert_role(conn, team_id, ADMIN_ROLE, false, &admin_permissions()).await?;
    let member = insert_role(conn, team_id, MEMBER_ROLE, false, &member_permissions()).await?;
    Ok((admin, member))
}

/// Add a permission to a role's bundle.
///
/// Returns `false` if the role already held it.
pub async fn grant_permission<C: ConnectionTrait>(conn: &C, role_id: Uuid, permission: Permission) -> Result<bool> {
    let existing = role_permissions::Entity::find()
        .filter(role_permissions::Column::RoleId.eq(role_id))
        .filter(role_permissions::Column::Action.eq(permission.action))
        .filter(role_permissions::Column::ResourceType.eq(permission.resource_type))
        .one(conn)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    role_permissions::ActiveModel {
        id:            Set(Uuid::new_v4()),
        role_id:       Set(role_id),
        action:        Set(permission.action),
        resource_type: Set(permission.resource_type),
    }
    .insert(conn)
    .await?;
    Ok(true)
}

/// Remove a permission from a role's bundle.
///
/// Returns `false` if the role did not hold it.
pub async fn revoke_permission<C: ConnectionTrait>(conn: &C, role_id: Uuid, permission: Permission) -> Result<bool> {
    let result = role_permissions::Entity::delete_many()
        .filter(role_permissions::Column::RoleId.eq(role_id))
        .filter(role_permissions::Column::Action.eq(permission.action))
        .filter(role_permissions::Column::ResourceType.eq(permission.resource_type))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

async fn find_membership<C: ConnectionTrait>(conn: &C, team_id: Uuid, user_id: Uuid) -> Result<memberships::Model> {
    current_membership(conn, team_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} is not a member of team {}", user_id, team_id)))
}

/// Put a member on one of the team's roles.
///
/// # Errors
///
/// - `NotFound` if the user is not a member or the role does not exist
/// - `BadRequest` if the role belongs to another team or is someone's personal role
pub async fn assign_role<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    user_id: Uuid,
    role_id: Uuid,
) -> Result<memberships::Model> {
    let role = find_team_role(conn, team_id, role_id).await?;
    if role.is_personal {
        return Err(AppError::bad_request(format!(
            "Role {} holds one member's direct grants and cannot be assigned",
            role.id
        )));
    }
    let membership = find_membership(conn, team_id, user_id).await?;

    let mut active: memberships::ActiveModel = membership.into();
    active.role_id = Set(Some(role.id));
    let membership = active.update(conn).await?;

    info!(team_id = %team_id, user_id = %user_id, role = %role.name, "Member role assigned");
    Ok(membership)
}

/// Grant permissions to a single member.
///
/// Grants live in the member's personal role. Moving a member onto it seeds
/// it with their current role bundle so nothing they held before is lost.
/// Later grants extend it.
pub async fn grant_direct_permissions<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    user_id: Uuid,
    permissions: &[Permission],
) -> Result<roles::Model> {
    let membership = find_membership(conn, team_id, user_id).await?;

    let current = match membership.role_id {
        Some(role_id) => roles::Entity::find_by_id(role_id).one(conn).await?,
        None => None,
    };

    let name = personal_role_name(user_id);
    let role = match current {
        Some(role) if role.is_personal && role.team_id == team_id && role.name == name => role,
        current => {
            let seed = match current {
                Some(ref role) if role.team_id == team_id => role_permissions(conn, role.id).await?,
                _ => BTreeSet::new(),
            };
            let role = match find_role_by_name(conn, team_id, &name).await? {
                Some(existing) => {
                    for permission in &seed {
                        grant_permission(conn, existing.id, *permission).await?;
                    }
                    existing
                },
                None => {
                    let seed: Vec<Permission> = seed.into_iter().collect();
                    insert_role(conn, team_id, &name, true, &seed).await?
                },
            };

            let mut active: memberships::ActiveModel = membership.into();
            active.role_id = Set(Some(role.id));
            active.update(conn).await?;
            role
        },
    };

    for permission in permissions {
        grant_permission(conn, role.id, *permission).await?;
    }

    info!(
        team_id = %team_id,
        user_id = %user_id,
        role_id = %role.id,
        granted = permissions.len(),
        "Direct permissions granted"
    );
    Ok(role)
}

/// Name of the personal role holding a member's direct grants.
#[must_use]
pub fn personal_role_name(user_id: Uuid) -> String { format!("personal:{}", user_id) }
