use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reusable push message body.
///
/// `content` may contain `{{name}}`, `{{event_title}}`, `{{event_date}}` and
/// `{{event_location}}` placeholders which are rendered per recipient.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "push_template")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::push_record::Entity")]
    PushRecord,
}

impl Related<super::push_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PushRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
