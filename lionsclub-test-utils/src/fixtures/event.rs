//! Event, registration and check-in fixtures.

use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::{EventStatus, RegistrationStatus};
use sea_orm::{ActiveModelTrait, ActiveValue};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn event<'a>(&'a mut self) -> EventFixtures<'a> {
        EventFixtures { setup: self }
    }
}

pub struct EventFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> EventFixtures<'a> {
    /// Insert an upcoming event starting in 7 days.
    ///
    /// # Arguments
    /// - `title` - Event title
    /// - `capacity` - Maximum attendees, `None` for unlimited
    ///
    /// # Returns
    /// - `Ok(entity::event::Model)` - The inserted event
    /// - `Err(TestError::DbErr)` - Insert failed
    pub async fn insert_event(
        &self,
        title: &str,
        capacity: Option<i32>,
    ) -> Result<entity::event::Model, TestError> {
        self.insert_event_with_status(title, capacity, EventStatus::Upcoming)
            .await
    }

    /// Insert an event with the given status starting in 7 days.
    pub async fn insert_event_with_status(
        &self,
        title: &str,
        capacity: Option<i32>,
        status: EventStatus,
    ) -> Result<entity::event::Model, TestError> {
        let now = Utc::now().naive_utc();
        let starts_at = now + Duration::days(7);

        let event = entity::event::ActiveModel {
            title: ActiveValue::Set(title.to_string()),
            description: ActiveValue::Set(Some(format!("{} description", title))),
            location: ActiveValue::Set(Some("Club House".to_string())),
            starts_at: ActiveValue::Set(starts_at),
            ends_at: ActiveValue::Set(Some(starts_at + Duration::hours(2))),
            capacity: ActiveValue::Set(capacity),
            status: ActiveValue::Set(status),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(event.insert(&self.setup.db).await?)
    }

    /// Insert a registration for a member.
    pub async fn insert_registration(
        &self,
        member_id: i32,
        event_id: i32,
        status: RegistrationStatus,
    ) -> Result<entity::registration::Model, TestError> {
        let now = Utc::now().naive_utc();

        let registration = entity::registration::ActiveModel {
            member_id: ActiveValue::Set(member_id),
            event_id: ActiveValue::Set(event_id),
            status: ActiveValue::Set(status),
            notes: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(registration.insert(&self.setup.db).await?)
    }

    /// Insert a check-in for a member.
    pub async fn insert_checkin(
        &self,
        member_id: i32,
        event_id: i32,
    ) -> Result<entity::checkin::Model, TestError> {
        let checkin = entity::checkin::ActiveModel {
            member_id: ActiveValue::Set(member_id),
            event_id: ActiveValue::Set(event_id),
            checked_in_at: ActiveValue::Set(Utc::now().naive_utc()),
            device_info: ActiveValue::Set(None),
            ..Default::default()
        };

        Ok(checkin.insert(&self.setup.db).await?)
    }
}
