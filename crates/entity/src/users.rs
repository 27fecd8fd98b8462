//! Users Entity
//!
//! Identity records owned by the external account subsystem. The core only
//! reads them to resolve members, inviters and notice authors.
//!
//! CUSTOMIZATION REGION START: user_entity_custom_types
//! This region is preserved during entity regeneration. Add custom types and implementations here.
//! CUSTOMIZATION REGION END

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:         uuid::Uuid,
    #[sea_orm(unique)]
    pub email:      String,
    pub first_name: String,
    pub last_name:  String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::memberships::Entity")]
    Memberships,
}

impl Related<super::memberships::Entity> for Entity {
    fn to() -> RelationDef { Relation::Memberships.def() }
}

impl ActiveModelBehavior for ActiveModel {}

// CUSTOMIZATION REGION START: user_entity_methods
impl Model {
    /// Name shown in member lists, falling back to the email address.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        }
        else {
            full.to_string()
        }
    }
}
// CUSTOMIZATION REGION END
