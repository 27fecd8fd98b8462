//! Classes Entity
//!
//! Weekly recurring timetable slots.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::Weekday;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:          uuid::Uuid,
    pub team_id:     uuid::Uuid,
    pub title:       String,
    pub day:         Weekday,
    pub start_time:  chrono::NaiveTime,
    pub end_time:    chrono::NaiveTime,
    pub location:    Option<String>,
    pub description: Option<String>,
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
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef { Relation::Team.def() }
}

impl ActiveModelBehavior for ActiveModel {}
