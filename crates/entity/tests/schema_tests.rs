//! Schema tests for entity crate
//! Creates the in-memory schema and round-trips rows through the stored codes.

use chrono::{NaiveTime, Utc};
use entity::{
    classes,
    memberships,
    role_permissions,
    roles,
    sea_orm_active_enums::{Action, ResourceType, Weekday},
    teams,
    testing,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

async fn insert_team(db: &sea_orm::DatabaseConnection, name: &str, parent: Option<Uuid>) -> teams::Model {
    teams::ActiveModel {
        id:             Set(Uuid::new_v4()),
        name:           Set(name.to_string()),
        description:    Set(None),
        parent_team_id: Set(parent),
        created_at:     Set(Utc::now()),
        updated_at:     Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_memory_db_creates_tables() {
    let db = testing::memory_db().await.unwrap();
    let user = testing::create_user(&db, "ada@example.com").await.unwrap();
    assert_eq!(user.first_name, "ada");
    assert_eq!(user.display_name(), "ada Tester");

    let root = insert_team(&db, "Root", None).await;
    let child = insert_team(&db, "Child", Some(root.id)).await;
    assert!(root.is_root());
    assert!(!child.is_root());
}

#[tokio::test]
async fn test_permission_codes_round_trip() {
    let db = testing::memory_db().await.unwrap();
    let team = insert_team(&db, "Robotics", None).await;
    let role = roles::ActiveModel {
        id:          Set(Uuid::new_v4()),
        team_id:     Set(team.id),
        name:        Set("Admin".to_string()),
        is_personal: Set(false),
        created_at:  Set(Utc::now()),
    }
    .insert(&db)
    .await
    .unwrap();

    role_permissions::ActiveModel {
        id:            Set(Uuid::new_v4()),
        role_id:       Set(role.id),
        action:        Set(Action::Create),
        resource_type: Set(ResourceType::JoinRequest),
    }
    .insert(&db)
    .await
    .unwrap();

    let found = role_permissions::Entity::find()
        .filter(role_permissions::Column::RoleId.eq(role.id))
        .filter(role_permissions::Column::ResourceType.eq(ResourceType::JoinRequest))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.action, Action::Create);

    let user = testing::create_user(&db, "grace@example.com").await.unwrap();
    let membership = memberships::ActiveModel {
        id:         Set(Uuid::new_v4()),
        team_id:    Set(team.id),
        user_id:    Set(user.id),
        role_id:    Set(Some(role.id)),
        alumni:     Set(false),
        created_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .unwrap();
    assert!(membership.is_active());
}

#[tokio::test]
async fn test_classes_order_by_day() {
    let db = testing::memory_db().await.unwrap();
    let team = insert_team(&db, "Chess", None).await;
    for (title, day) in [("Fri", Weekday::Friday), ("Mon", Weekday::Monday), ("Wed", Weekday::Wednesday)] {
        classes::ActiveModel {
            id:          Set(Uuid::new_v4()),
            team_id:     Set(team.id),
            title:       Set(title.to_string()),
            day:         Set(day),
            start_time:  Set(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            end_time:    Set(NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
            location:    Set(None),
            description: Set(None),
        }
        .insert(&db)
        .await
        .unwrap();
    }

    let titles: Vec<String> = classes::Entity::find()
        .order_by_asc(classes::Column::Day)
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, vec!["Mon", "Wed", "Fri"]);
}
