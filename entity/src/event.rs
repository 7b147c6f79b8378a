use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EventStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime,
    pub ends_at: Option<DateTime>,
    /// Maximum number of attendees, `None` for unlimited
    pub capacity: Option<i32>,
    pub status: EventStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::registration::Entity")]
    Registration,
    #[sea_orm(has_many = "super::checkin::Entity")]
    Checkin,
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl Related<super::checkin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Checkin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
