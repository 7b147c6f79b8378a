use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::{MemberRole, MessageDirection, PushStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PushTemplateDto {
    pub id: i32,
    pub name: String,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::push_template::Model> for PushTemplateDto {
    fn from(template: entity::push_template::Model) -> Self {
        Self {
            id: template.id,
            name: template.name,
            title: template.title,
            content: template.content,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePushTemplateDto {
    pub name: String,
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePushTemplateDto {
    pub name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Who receives a push message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PushTargetDto {
    /// Every active member linked to LINE
    All,
    /// Active members whose role is at least `role`
    Role {
        #[schema(value_type = String, example = "officer")]
        role: MemberRole,
    },
    /// Members holding a confirmed registration for the event
    Event { event_id: i32 },
    /// An explicit list of members
    Members { member_ids: Vec<i32> },
}

/// Push request, either `message` or `template_id` must be provided
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendPushDto {
    pub target: PushTargetDto,
    pub title: Option<String>,
    pub message: Option<String>,
    pub template_id: Option<i32>,
    /// Event used to render `{{event_*}}` placeholders, defaults to the target event
    pub event_id: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PushRecordDto {
    pub id: i32,
    pub template_id: Option<i32>,
    pub event_id: Option<i32>,
    pub title: Option<String>,
    pub content: String,
    pub target: String,
    pub recipient_count: i32,
    pub success_count: i32,
    pub failure_count: i32,
    #[schema(value_type = String, example = "sent")]
    pub status: PushStatus,
    pub created_at: NaiveDateTime,
}

impl From<entity::push_record::Model> for PushRecordDto {
    fn from(record: entity::push_record::Model) -> Self {
        Self {
            id: record.id,
            template_id: record.template_id,
            event_id: record.event_id,
            title: record.title,
            content: record.content,
            target: record.target,
            recipient_count: record.recipient_count,
            success_count: record.success_count,
            failure_count: record.failure_count,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageLogDto {
    pub id: i32,
    #[schema(value_type = String, example = "inbound")]
    pub direction: MessageDirection,
    pub line_user_id: Option<String>,
    pub member_id: Option<i32>,
    pub message_type: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl From<entity::message_log::Model> for MessageLogDto {
    fn from(log: entity::message_log::Model) -> Self {
        Self {
            id: log.id,
            direction: log.direction,
            line_user_id: log.line_user_id,
            member_id: log.member_id,
            message_type: log.message_type,
            content: log.content,
            created_at: log.created_at,
        }
    }
}
