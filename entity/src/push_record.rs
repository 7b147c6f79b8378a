use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PushStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "push_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub template_id: Option<i32>,
    pub event_id: Option<i32>,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub target: String,
    pub recipient_count: i32,
    pub success_count: i32,
    pub failure_count: i32,
    pub status: PushStatus,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::push_template::Entity",
        from = "Column::TemplateId",
        to = "super::push_template::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    PushTemplate,
}

impl Related<super::push_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PushTemplate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
