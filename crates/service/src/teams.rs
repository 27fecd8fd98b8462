//! # Teams
//!
//! Team creation, the team page, membership changes and hierarchy edits.

use std::collections::HashMap;

use auth::{ancestors, children, ensure_can_reparent, require_permission, roles, Action, Permission, ResourceType};
use chrono::Utc;
use entity::{classes, events, invites, join_requests, memberships, notices, role_permissions, teams};
use error::{AppError, Result};
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
    dto::teams::{CreateTeamRequest, MemberView, ReparentTeamRequest, TeamInfoView, TeamRef, TeamSummary},
    requests::{load_users, user_ref},
    validate_request,
    AppState,
    AuthenticatedUser,
};

async fn find_team<C: ConnectionTrait>(conn: &C, team_id: Uuid) -> Result<teams::Model> {
    teams::Entity::find_by_id(team_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team {} not found", team_id)))
}

/// Create a team
///
/// The team gets an admin role holding every permission and a member role
/// with read access. The creator becomes its admin. Creating a sub-team
/// requires `(Create, Team)` on the parent.
pub async fn create_team(state: &AppState, user: &AuthenticatedUser, req: CreateTeamRequest) -> Result<TeamSummary> {
    validate_request(&req)?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Team name must not be empty"));
    }

    let txn = state.db.begin().await?;

    if let Some(parent_id) = req.parent_team_id {
        find_team(&txn, parent_id).await?;
        require_permission(
            &txn,
            user.id,
            parent_id,
            Permission::new(Action::Create, ResourceType::Team),
        )
        .await?;
    }

    let now = Utc::now();
    let team = teams::ActiveModel {
        id:             Set(Uuid::new_v4()),
        name:           Set(name.to_string()),
        description:    Set(req.description),
        parent_team_id: Set(req.parent_team_id),
        created_at:     Set(now),
        updated_at:     Set(now),
    }
    .insert(&txn)
    .await?;

    let (admin, _member) = roles::create_default_roles(&txn, team.id).await?;

    memberships::ActiveModel {
        id:         Set(Uuid::new_v4()),
        team_id:    Set(team.id),
        user_id:    Set(user.id),
        role_id:    Set(Some(admin.id)),
        alumni:     Set(false),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        team_id = %team.id,
        parent_team_id = ?team.parent_team_id,
        user_id = %user.id,
        "Team created"
    );
    Ok(TeamSummary::from(&team))
}

/// Team page: the team, its ancestors, sub-teams and members
///
/// Visible to any authenticated user.
pub async fn team_info(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<TeamInfoView> {
    let team = find_team(&state.db, team_id).await?;
    let parents = ancestors(&state.db, team_id).await?;
    let sub_teams = children(&state.db, team_id).await?;

    let member_rows = memberships::Entity::find()
        .filter(memberships::Column::TeamId.eq(team_id))
        .order_by_asc(memberships::Column::CreatedAt)
        .all(&state.db)
        .await?;
    let users = load_users(&state.db, member_rows.iter().map(|m| m.user_id)).await?;
    let role_names: HashMap<Uuid, String> = roles::team_roles(&state.db, team_id)
        .await?
        .into_iter()
        .map(|role| (role.id, role.name))
        .collect();

    let members = member_rows
        .into_iter()
        .map(|membership| {
            Ok(MemberView {
                user:       user_ref(&users, membership.user_id)?,
                role_id:    membership.role_id,
                role_name:  membership
                    .role_id
                    .and_then(|role_id| role_names.get(&role_id).cloned()),
                alumni:     membership.alumni,
                created_at: membership.created_at,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(team_id = %team_id, user_id = %user.id, members = members.len(), "Team info loaded");

    Ok(TeamInfoView {
        team: TeamSummary::from(&team),
        parents: parents.iter().map(TeamRef::from).collect(),
        children: sub_teams.iter().map(TeamRef::from).collect(),
        members,
    })
}

/// Leave a team, deleting the acting user's membership
pub async fn leave_team(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<()> {
    let result = memberships::Entity::delete_many()
        .filter(memberships::Column::TeamId.eq(team_id))
        .filter(memberships::Column::UserId.eq(user.id))
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found(format!(
            "User {} is not a member of team {}",
            user.id, team_id
        )));
    }

    info!(team_id = %team_id, user_id = %user.id, "Member left team");
    Ok(())
}

/// Mark a member as alumni, or make them active again
///
/// Requires `(Update, Team)`.
pub async fn set_alumni(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    member_id: Uuid,
    alumni: bool,
) -> Result<memberships::Model> {
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Update, ResourceType::Team),
    )
    .await?;

    let membership = memberships::Entity::find()
        .filter(memberships::Column::TeamId.eq(team_id))
        .filter(memberships::Column::UserId.eq(member_id))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} is not a member of team {}", member_id, team_id)))?;

    let mut active: memberships::ActiveModel = membership.into();
    active.alumni = Set(alumni);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(team_id = %team_id, member_id = %member_id, alumni, actor = %user.id, "Alumni flag changed");
    Ok(updated)
}

/// Delete a team and everything scoped to it
///
/// Requires `(Delete, Team)`. Sub-teams become root teams. Runs as one
/// transaction.
pub async fn delete_team(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<()> {
    let txn = state.db.begin().await?;

    let team = find_team(&txn, team_id).await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Delete, ResourceType::Team),
    )
    .await?;

    teams::Entity::update_many()
        .col_expr(teams::Column::ParentTeamId, Expr::value(Option::<Uuid>::None))
        .col_expr(teams::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(teams::Column::ParentTeamId.eq(team_id))
        .exec(&txn)
        .await?;

    invites::Entity::delete_many()
        .filter(invites::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    join_requests::Entity::delete_many()
        .filter(join_requests::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    classes::Entity::delete_many()
        .filter(classes::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    events::Entity::delete_many()
        .filter(events::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    notices::Entity::delete_many()
        .filter(notices::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    let removed_members = memberships::Entity::delete_many()
        .filter(memberships::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?
        .rows_affected;

    let role_ids: Vec<Uuid> = roles::team_roles(&txn, team_id)
        .await?
        .into_iter()
        .map(|role| role.id)
        .collect();
    if !role_ids.is_empty() {
        role_permissions::Entity::delete_many()
            .filter(role_permissions::Column::RoleId.is_in(role_ids.clone()))
            .exec(&txn)
            .await?;
        entity::roles::Entity::delete_many()
            .filter(entity::roles::Column::Id.is_in(role_ids))
            .exec(&txn)
            .await?;
    }

    teams::Entity::delete_by_id(team.id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        team_id = %team_id,
        name = %team.name,
        removed_members,
        actor = %user.id,
        "Team deleted"
    );
    Ok(())
}

/// Move a team under a new parent, or make it a root team
///
/// Requires `(Update, Team)` on the team and `(Create, Team)` on the new
/// parent. Moving a team under itself or one of its descendants is rejected.
pub async fn reparent_team(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    req: ReparentTeamRequest,
) -> Result<TeamSummary> {
    let txn = state.db.begin().await?;

    let team = find_team(&txn, team_id).await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Update, ResourceType::Team),
    )
    .await?;
    if let Some(parent_id) = req.parent_team_id {
        find_team(&txn, parent_id).await?;
        require_permission(
            &txn,
            user.id,
            parent_id,
            Permission::new(Action::Create, ResourceType::Team),
        )
        .await?;
    }
    ensure_can_reparent(&txn, team_id, req.parent_team_id).await?;

    let previous = team.parent_team_id;
    let mut active: teams::ActiveModel = team.into();
    active.parent_team_id = Set(req.parent_team_id);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(
        team_id = %team_id,
        from = ?previous,
        to = ?req.parent_team_id,
        actor = %user.id,
        "Team reparented"
    );
    Ok(TeamSummary::from(&updated))
}
