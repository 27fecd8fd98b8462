//! Integration tests for role bundles and direct grants

mod common;

use auth::{
    roles::{self, role_permissions},
    team_permissions,
    Action,
    Permission,
    ResourceType,
};
use error::AppError;

#[tokio::test]
async fn test_default_roles() {
    let db = common::test_db().await;
    let team = common::create_team(&db, "A", None).await;
    let (admin, member) = roles::create_default_roles(&db, team.id).await.unwrap();

    assert_eq!(admin.name, roles::ADMIN_ROLE);
    assert_eq!(role_permissions(&db, admin.id).await.unwrap().len(), 28);
    let member_bundle = role_permissions(&db, member.id).await.unwrap();
    assert!(member_bundle.contains(&Permission::new(Action::Read, ResourceType::Notice)));
    assert!(!member_bundle.contains(&Permission::new(Action::Create, ResourceType::Notice)));
}

#[tokio::test]
async fn test_duplicate_role_name_conflicts() {
    let db = common::test_db().await;
    let team = common::create_team(&db, "A", None).await;
    common::create_role(&db, team.id, "Coach", &[]).await;

    let err = roles::create_role(&db, team.id, "Coach", &[]).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict { .. }));
}

#[tokio::test]
async fn test_grant_and_revoke_are_idempotent() {
    let db = common::test_db().await;
    let team = common::create_team(&db, "A", None).await;
    let role = common::create_role(&db, team.id, "Coach", &[]).await;
    let perm = Permission::new(Action::Create, ResourceType::Event);

    assert!(roles::grant_permission(&db, role.id, perm).await.unwrap());
    assert!(!roles::grant_permission(&db, role.id, perm).await.unwrap());
    assert!(roles::revoke_permission(&db, role.id, perm).await.unwrap());
    assert!(!roles::revoke_permission(&db, role.id, perm).await.unwrap());
}

#[tokio::test]
async fn test_assign_role_from_other_team_rejected() {
    let db = common::test_db().await;
    let team = common::create_team(&db, "A", None).await;
    let other = common::create_team(&db, "B", None).await;
    let user = common::create_user(&db, "u@example.com").await;
    common::add_member(&db, team.id, user.id, None, false).await;
    let foreign = common::create_role(&db, other.id, "Admin", &Permission::all()).await;

    let err = roles::assign_role(&db, team.id, user.id, foreign.id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest { .. }));
}

#[tokio::test]
async fn test_direct_grant_keeps_previous_bundle() {
    let db = common::test_db().await;
    let team = common::create_team(&db, "A", None).await;
    let user = common::create_user(&db, "u@example.com").await;
    let reader = common::create_role(&db, team.id, "Reader", &[Permission::new(Action::Read, ResourceType::Class)]).await;
    common::add_member(&db, team.id, user.id, Some(reader.id), false).await;

    let create_class = Permission::new(Action::Create, ResourceType::Class);
    let personal = roles::grant_direct_permissions(&db, team.id, user.id, &[create_class]).await.unwrap();
    assert!(personal.is_personal);

    let effective = team_permissions(&db, user.id, team.id).await.unwrap();
    assert!(effective.contains(&create_class));
    assert!(effective.contains(&Permission::new(Action::Read, ResourceType::Class)));

    // The shared role is untouched.
    assert_eq!(role_permissions(&db, reader.id).await.unwrap().len(), 1);

    // A second grant extends the same personal role.
    let delete_class = Permission::new(Action::Delete, ResourceType::Class);
    let again = roles::grant_direct_permissions(&db, team.id, user.id, &[delete_class]).await.unwrap();
    assert_eq!(again.id, personal.id);
    assert_eq!(team_permissions(&db, user.id, team.id).await.unwrap().len(), 3);
}
