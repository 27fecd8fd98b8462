//! # CLI Check Command
//!
//! Resolves a single permission question against the configured database.

use auth::{check_permission, Permission, PermissionCheckResult};
use entity::{teams, users};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::CheckArgs;

/// Find a user by ID, or by email when `user` is not a UUID
pub async fn resolve_user<C: ConnectionTrait>(conn: &C, user: &str) -> Result<users::Model> {
    let found = match Uuid::parse_str(user) {
        Ok(id) => users::Entity::find_by_id(id).one(conn).await?,
        Err(_) => {
            users::Entity::find()
                .filter(users::Column::Email.eq(user))
                .one(conn)
                .await?
        },
    };
    found.ok_or_else(|| AppError::not_found(format!("User {} not found", user)))
}

/// Answer whether the user holds the permission in the team
///
/// # Errors
///
/// - `BadRequest` if the permission is not in `resource:action` form
/// - `NotFound` if the user or team does not exist
pub async fn check<C: ConnectionTrait>(conn: &C, args: &CheckArgs) -> Result<PermissionCheckResult> {
    let permission: Permission = args.permission.parse()?;
    let user = resolve_user(conn, &args.user).await?;
    teams::Entity::find_by_id(args.team)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team {} not found", args.team)))?;

    check_permission(conn, user.id, args.team, permission).await
}
