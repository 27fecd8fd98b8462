//! # Roles
//!
//! Role management within a team. Every operation is gated by the
//! `permission` resource: creating a role needs `(Create, Permission)`,
//! changing bundles or assignments needs `(Update, Permission)` and listing
//! needs `(Read, Permission)`.

use auth::{require_permission, roles, Action, Permission, ResourceType};
use error::Result;
use permissions_macro::with_permission;
use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::roles::{CreateRoleRequest, RoleView},
    validate_request,
    AppState,
    AuthenticatedUser,
};

async fn role_view<C: ConnectionTrait>(conn: &C, role: &entity::roles::Model) -> Result<RoleView> {
    let permissions = roles::role_permissions(conn, role.id).await?;
    Ok(RoleView::new(role, permissions))
}

/// Create a role with an initial bundle
pub async fn create_role(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    req: CreateRoleRequest,
) -> Result<RoleView> {
    validate_request(&req)?;
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Create, ResourceType::Permission),
    )
    .await?;

    let role = roles::create_role(&txn, team_id, &req.name, &req.permissions).await?;
    let view = role_view(&txn, &role).await?;
    txn.commit().await?;

    info!(role_id = %role.id, team_id = %team_id, actor = %user.id, "Role created by member");
    Ok(view)
}

/// Put a member on one of the team's roles
pub async fn assign_member_role(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    member_id: Uuid,
    role_id: Uuid,
) -> Result<RoleView> {
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Update, ResourceType::Permission),
    )
    .await?;

    roles::assign_role(&txn, team_id, member_id, role_id).await?;
    let role = roles::find_team_role(&txn, team_id, role_id).await?;
    let view = role_view(&txn, &role).await?;
    txn.commit().await?;

    info!(team_id = %team_id, member_id = %member_id, role_id = %role_id, actor = %user.id, "Role assigned");
    Ok(view)
}

/// Add a permission to a role of the team
pub async fn grant_role_permission(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    role_id: Uuid,
    permission: Permission,
) -> Result<RoleView> {
    edit_bundle(state, user, team_id, role_id, permission, true).await
}

/// Remove a permission from a role of the team
pub async fn revoke_role_permission(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    role_id: Uuid,
    permission: Permission,
) -> Result<RoleView> {
    edit_bundle(state, user, team_id, role_id, permission, false).await
}

async fn edit_bundle(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    role_id: Uuid,
    permission: Permission,
    grant: bool,
) -> Result<RoleView> {
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Update, ResourceType::Permission),
    )
    .await?;

    let role = roles::find_team_role(&txn, team_id, role_id).await?;
    let changed = if grant {
        roles::grant_permission(&txn, role.id, permission).await?
    }
    else {
        roles::revoke_permission(&txn, role.id, permission).await?
    };
    let view = role_view(&txn, &role).await?;
    txn.commit().await?;

    info!(
        role_id = %role_id,
        team_id = %team_id,
        permission = %permission,
        grant,
        changed,
        actor = %user.id,
        "Role bundle edited"
    );
    Ok(view)
}

/// Grant permissions to one member through their personal role
pub async fn grant_direct_permissions(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    member_id: Uuid,
    permissions: Vec<Permission>,
) -> Result<RoleView> {
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Update, ResourceType::Permission),
    )
    .await?;

    let role = roles::grant_direct_permissions(&txn, team_id, member_id, &permissions).await?;
    let view = role_view(&txn, &role).await?;
    txn.commit().await?;
    Ok(view)
}

/// Roles of a team with their bundles, ordered by name
#[with_permission(Permission::new(Action::Read, ResourceType::Permission))]
pub async fn list_roles(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<Vec<RoleView>> {
    let mut views = Vec::new();
    for role in roles::team_roles(&state.db, team_id).await? {
        views.push(role_view(&state.db, &role).await?);
    }
    Ok(views)
}
