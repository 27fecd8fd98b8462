//! Teams Entity
//!
//! Represents teams with hierarchical structure support. A team without a
//! parent is a root team. The store does not enforce acyclicity, so readers
//! walking `parent_team_id` must guard against loops.
//!
//! CUSTOMIZATION REGION START: teams_entity_custom_types
//! This region is preserved during entity regeneration. Add custom types and implementations here.
//! CUSTOMIZATION REGION END

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:             uuid::Uuid,
    pub name:           String,
    pub description:    Option<String>,
    pub parent_team_id: Option<uuid::Uuid>,
    pub created_at:     chrono::DateTime<chrono::Utc>,
    pub updated_at:     chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentTeamId",
        to = "Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    ParentTeam,
    #[sea_orm(has_many = "super::roles::Entity")]
    Roles,
    #[sea_orm(has_many = "super::memberships::Entity")]
    Memberships,
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef { Relation::Roles.def() }
}

impl Related<super::memberships::Entity> for Entity {
    fn to() -> RelationDef { Relation::Memberships.def() }
}

impl ActiveModelBehavior for ActiveModel {}

// CUSTOMIZATION REGION START: teams_entity_methods
impl Model {
    pub fn is_root(&self) -> bool { self.parent_team_id.is_none() }
}
// CUSTOMIZATION REGION END
