use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::RegistrationStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationDto {
    pub id: i32,
    pub member_id: i32,
    pub event_id: i32,
    #[schema(value_type = String, example = "confirmed")]
    pub status: RegistrationStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::registration::Model> for RegistrationDto {
    fn from(registration: entity::registration::Model) -> Self {
        Self {
            id: registration.id,
            member_id: registration.member_id,
            event_id: registration.event_id,
            status: registration.status,
            notes: registration.notes,
            created_at: registration.created_at,
            updated_at: registration.updated_at,
        }
    }
}

/// Registration request, the member is identified by exactly one of `member_id` or `line_user_id`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRegistrationDto {
    pub member_id: Option<i32>,
    pub line_user_id: Option<String>,
    pub event_id: i32,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRegistrationDto {
    #[schema(value_type = String, example = "confirmed")]
    pub status: RegistrationStatus,
    pub notes: Option<String>,
}
