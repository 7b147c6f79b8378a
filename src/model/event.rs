use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::EventStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EventDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: Option<NaiveDateTime>,
    pub capacity: Option<i32>,
    #[schema(value_type = String, example = "upcoming")]
    pub status: EventStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::event::Model> for EventDto {
    fn from(event: entity::event::Model) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            location: event.location,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            capacity: event.capacity,
            status: event.status,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Event with its attendance counters
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EventDetailDto {
    #[serde(flatten)]
    pub event: EventDto,
    pub confirmed_count: u64,
    pub waitlist_count: u64,
    pub checkin_count: u64,
    /// Remaining confirmed places, `None` when the event has no capacity limit
    pub spots_left: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EventSummaryDto {
    pub id: i32,
    pub title: String,
    pub starts_at: NaiveDateTime,
    pub location: Option<String>,
}

impl From<&entity::event::Model> for EventSummaryDto {
    fn from(event: &entity::event::Model) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            starts_at: event.starts_at,
            location: event.location.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateEventDto {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: Option<NaiveDateTime>,
    pub capacity: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub status: Option<EventStatus>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub capacity: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub status: Option<EventStatus>,
}
