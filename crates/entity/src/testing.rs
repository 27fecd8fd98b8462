//! In-memory database helpers for tests across the workspace.
//!
//! Tables are created straight from the entity definitions so test schemas
//! never drift from the models.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ConnectOptions,
    ConnectionTrait,
    Database,
    DatabaseConnection,
    DbErr,
    EntityTrait,
    Schema,
    Set,
};

use crate::users;

/// Connect to a fresh in-memory SQLite database with every table created.
///
/// The pool holds a single connection because each SQLite memory connection
/// owns its own database.
pub async fn memory_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Create every table, parents before children.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, crate::Users).await?;
    create_table(db, crate::Teams).await?;
    create_table(db, crate::Roles).await?;
    create_table(db, crate::RolePermissions).await?;
    create_table(db, crate::Memberships).await?;
    create_table(db, crate::Invites).await?;
    create_table(db, crate::JoinRequests).await?;
    create_table(db, crate::Classes).await?;
    create_table(db, crate::Events).await?;
    create_table(db, crate::Notices).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(entity)))
        .await?;
    Ok(())
}

/// Insert a user with the given email and a name derived from it.
pub async fn create_user<C: ConnectionTrait>(db: &C, email: &str) -> Result<users::Model, DbErr> {
    let first_name = email.split('@').next().unwrap_or(email).to_string();
    users::ActiveModel {
        id:         Set(uuid::Uuid::new_v4()),
        email:      Set(email.to_string()),
        first_name: Set(first_name),
        last_name:  Set("Tester".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
}
