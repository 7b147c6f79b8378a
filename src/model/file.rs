use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FileDto {
    pub id: i32,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub event_id: Option<i32>,
    pub member_id: Option<i32>,
    pub download_url: String,
    pub created_at: NaiveDateTime,
}

impl From<entity::file::Model> for FileDto {
    fn from(file: entity::file::Model) -> Self {
        Self {
            download_url: format!("/api/files/{}/download", file.id),
            id: file.id,
            original_name: file.original_name,
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            event_id: file.event_id,
            member_id: file.member_id,
            created_at: file.created_at,
        }
    }
}
