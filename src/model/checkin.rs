use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{event::EventSummaryDto, member::MemberSummaryDto};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckinDto {
    pub id: i32,
    pub member_id: i32,
    pub event_id: i32,
    pub checked_in_at: NaiveDateTime,
    pub device_info: Option<String>,
}

impl From<entity::checkin::Model> for CheckinDto {
    fn from(checkin: entity::checkin::Model) -> Self {
        Self {
            id: checkin.id,
            member_id: checkin.member_id,
            event_id: checkin.event_id,
            checked_in_at: checkin.checked_in_at,
            device_info: checkin.device_info,
        }
    }
}

/// Check-in request, the member is identified by exactly one of `member_id` or `line_user_id`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCheckinDto {
    pub member_id: Option<i32>,
    pub line_user_id: Option<String>,
    pub event_id: i32,
    pub device_info: Option<String>,
}

/// Result of a successful check-in
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckinResultDto {
    pub id: i32,
    pub checked_in_at: NaiveDateTime,
    pub device_info: Option<String>,
    pub member: MemberSummaryDto,
    pub event: EventSummaryDto,
}
