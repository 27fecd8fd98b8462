//! Roles Entity
//!
//! A named bundle of permissions scoped to exactly one team. Personal roles
//! hold permissions granted directly to a single member.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:          uuid::Uuid,
    pub team_id:     uuid::Uuid,
    pub name:        String,
    pub is_personal: bool,
    pub created_at:  chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Team,
    #[sea_orm(has_many = "super::role_permissions::Entity")]
    RolePermissions,
    #[sea_orm(has_many = "super::memberships::Entity")]
    Memberships,
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef { Relation::Team.def() }
}

impl Related<super::role_permissions::Entity> for Entity {
    fn to() -> RelationDef { Relation::RolePermissions.def() }
}

impl Related<super::memberships::Entity> for Entity {
    fn to() -> RelationDef { Relation::Memberships.def() }
}

impl ActiveModelBehavior for ActiveModel {}
