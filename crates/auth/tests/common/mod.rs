//! # Common Test Utilities
//!
//! In-memory database setup and fixtures shared by the auth integration tests.

#![allow(dead_code)]

use std::sync::Once;

use auth::{roles, Permission};
use chrono::Utc;
use entity::{memberships, roles as role_entity, teams, testing, users};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Fresh in-memory database with the schema created
pub async fn test_db() -> DatabaseConnection {
    init_test_env();
    testing::memory_db().await.expect("in-memory database")
}

pub async fn create_user(db: &DatabaseConnection, email: &str) -> users::Model {
    testing::create_user(db, email).await.expect("insert user")
}

pub async fn create_team(db: &DatabaseConnection, name: &str, parent: Option<Uuid>) -> teams::Model {
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
    .expect("insert team")
}

pub async fn create_role(db: &DatabaseConnection, team_id: Uuid, name: &str, permissions: &[Permission]) -> role_entity::Model {
    roles::create_role(db, team_id, name, permissions)
        .await
        .expect("insert role")
}

pub async fn add_member(
    db: &DatabaseConnection,
    team_id: Uuid,
    user_id: Uuid,
    role_id: Option<Uuid>,
    alumni: bool,
) -> memberships::Model {
    memberships::ActiveModel {
        id:         Set(Uuid::new_v4()),
        team_id:    Set(team_id),
        user_id:    Set(user_id),
        role_id:    Set(role_id),
        alumni:     Set(alumni),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert membership")
}

/// Point a team at a new parent without any validation, to build broken chains.
pub async fn force_parent(db: &DatabaseConnection, team: &teams::Model, parent: Option<Uuid>) {
    let mut active: teams::ActiveModel = team.clone().into();
    active.parent_team_id = Set(parent);
    active.update(db).await.expect("update parent");
}
