use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{MemberRole, MemberStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[sea_orm(unique)]
    pub line_user_id: Option<String>,
    pub line_display_name: Option<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub joined_on: Option<Date>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::registration::Entity")]
    Registration,
    #[sea_orm(has_many = "super::checkin::Entity")]
    Checkin,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
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

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
