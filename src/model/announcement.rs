use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::AnnouncementStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AnnouncementDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    #[schema(value_type = String, example = "published")]
    pub status: AnnouncementStatus,
    pub push_to_line: bool,
    pub scheduled_at: Option<NaiveDateTime>,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::announcement::Model> for AnnouncementDto {
    fn from(announcement: entity::announcement::Model) -> Self {
        Self {
            id: announcement.id,
            title: announcement.title,
            content: announcement.content,
            status: announcement.status,
            push_to_line: announcement.push_to_line,
            scheduled_at: announcement.scheduled_at,
            published_at: announcement.published_at,
            created_at: announcement.created_at,
            updated_at: announcement.updated_at,
        }
    }
}

/// New announcement, created as `scheduled` when `scheduled_at` is set and `draft` otherwise
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAnnouncementDto {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub push_to_line: bool,
    pub scheduled_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateAnnouncementDto {
    pub title: Option<String>,
    pub content: Option<String>,
    pub push_to_line: Option<bool>,
    pub scheduled_at: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>)]
    pub status: Option<AnnouncementStatus>,
}

/// Outcome of publishing an announcement
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PublishResultDto {
    pub announcement: AnnouncementDto,
    /// ID of the push record when the announcement was pushed to LINE
    pub push_record_id: Option<i32>,
}
