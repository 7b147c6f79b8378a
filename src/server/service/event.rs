use chrono::{NaiveDateTime, Utc};
use entity::sea_orm_active_enums::{EventStatus, RegistrationStatus};
use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::{
    model::{
        checkin::CheckinDto,
        event::{CreateEventDto, EventDetailDto, EventDto, UpdateEventDto},
        registration::RegistrationDto,
    },
    server::{
        data::{
            checkin::CheckinRepository,
            event::EventRepository,
            registration::{RegistrationFilter, RegistrationRepository},
        },
        error::{event::EventError, Error},
        model::db::EventModel,
    },
};

/// Resolves an event by ID, failing with [`EventError::NotFound`]
pub async fn resolve_event<C: ConnectionTrait>(db: &C, event_id: i32) -> Result<EventModel, Error> {
    EventRepository::new(db)
        .get(event_id)
        .await?
        .ok_or_else(|| EventError::NotFound(event_id).into())
}

/// Resolves an event and locks its row for the rest of the transaction
///
/// Used before counting confirmed registrations against the capacity so two
/// concurrent changes can't both take the last place.
pub async fn resolve_event_for_update<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
) -> Result<EventModel, Error> {
    EventRepository::new(db)
        .get_for_update(event_id)
        .await?
        .ok_or_else(|| EventError::NotFound(event_id).into())
}

/// Checks the start/end ordering and capacity of an event
fn validate_schedule(
    starts_at: NaiveDateTime,
    ends_at: Option<NaiveDateTime>,
    capacity: Option<i32>,
) -> Result<(), EventError> {
    if let Some(ends_at) = ends_at {
        if ends_at < starts_at {
            return Err(EventError::EndsBeforeStart);
        }
    }

    match capacity {
        Some(capacity) if capacity < 0 => Err(EventError::NegativeCapacity(capacity)),
        _ => Ok(()),
    }
}

pub struct EventService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EventService<'a> {
    /// Creates a new instance of [`EventService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists events, `upcoming` limits the result to open events that have not started yet
    pub async fn list(
        &self,
        status: Option<EventStatus>,
        upcoming: bool,
    ) -> Result<Vec<EventDto>, Error> {
        let upcoming_after = upcoming.then(|| Utc::now().naive_utc());

        let events = EventRepository::new(self.db)
            .list(status, upcoming_after)
            .await?;

        Ok(events.into_iter().map(EventDto::from).collect())
    }

    /// Event with its confirmed, waitlist and check-in counters
    pub async fn get_detail(&self, event_id: i32) -> Result<EventDetailDto, Error> {
        let event = resolve_event(self.db, event_id).await?;

        let registrations = RegistrationRepository::new(self.db);
        let confirmed_count = registrations
            .count_by_event_and_status(event.id, RegistrationStatus::Confirmed)
            .await?;
        let waitlist_count = registrations
            .count_by_event_and_status(event.id, RegistrationStatus::Waitlist)
            .await?;
        let checkin_count = CheckinRepository::new(self.db)
            .count_by_event(event.id)
            .await?;

        let spots_left = event
            .capacity
            .map(|capacity| (capacity.max(0) as u64).saturating_sub(confirmed_count));

        Ok(EventDetailDto {
            event: event.into(),
            confirmed_count,
            waitlist_count,
            checkin_count,
            spots_left,
        })
    }

    /// Creates an event
    ///
    /// # Returns
    /// - `Ok(EventDto)` - The created event
    /// - `Err(Error::Validation)` - Empty title
    /// - `Err(Error::EventError)` - End before start or negative capacity
    pub async fn create(&self, event: CreateEventDto) -> Result<EventDto, Error> {
        if event.title.trim().is_empty() {
            return Err(Error::Validation("title must not be empty".to_string()));
        }
        validate_schedule(event.starts_at, event.ends_at, event.capacity)?;

        let event = EventRepository::new(self.db).create(event).await?;

        tracing::info!(event_id = %event.id, "Created event {}", event.title);

        Ok(event.into())
    }

    /// Applies a partial update, validating the resulting schedule
    pub async fn update(&self, event_id: i32, changes: UpdateEventDto) -> Result<EventDto, Error> {
        let current = resolve_event(self.db, event_id).await?;

        if let Some(title) = &changes.title {
            if title.trim().is_empty() {
                return Err(Error::Validation("title must not be empty".to_string()));
            }
        }
        validate_schedule(
            changes.starts_at.unwrap_or(current.starts_at),
            changes.ends_at.or(current.ends_at),
            changes.capacity.or(current.capacity),
        )?;

        let event = EventRepository::new(self.db)
            .update(event_id, changes)
            .await?
            .ok_or(EventError::NotFound(event_id))?;

        Ok(event.into())
    }

    /// Soft deletes an event by marking it cancelled
    pub async fn cancel(&self, event_id: i32) -> Result<EventDto, Error> {
        let event = EventRepository::new(self.db)
            .set_status(event_id, EventStatus::Cancelled)
            .await?
            .ok_or(EventError::NotFound(event_id))?;

        tracing::info!(event_id = %event.id, "Cancelled event");

        Ok(event.into())
    }

    pub async fn registrations(&self, event_id: i32) -> Result<Vec<RegistrationDto>, Error> {
        let event = resolve_event(self.db, event_id).await?;

        let registrations = RegistrationRepository::new(self.db)
            .list(&RegistrationFilter {
                event_id: Some(event.id),
                ..Default::default()
            })
            .await?;

        Ok(registrations
            .into_iter()
            .map(RegistrationDto::from)
            .collect())
    }

    pub async fn checkins(&self, event_id: i32) -> Result<Vec<CheckinDto>, Error> {
        let event = resolve_event(self.db, event_id).await?;

        let checkins = CheckinRepository::new(self.db)
            .list(Some(event.id), None)
            .await?;

        Ok(checkins.into_iter().map(CheckinDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    mod create {
        use chrono::{Duration, Utc};
        use lionsclub_test_utils::prelude::*;

        use crate::{
            model::event::CreateEventDto,
            server::{
                error::{event::EventError, Error},
                service::event::EventService,
            },
        };

        fn new_event(end_offset_hours: i64, capacity: Option<i32>) -> CreateEventDto {
            let starts_at = Utc::now().naive_utc() + Duration::days(3);

            CreateEventDto {
                title: "Charity Dinner".to_string(),
                description: None,
                location: Some("Grand Hotel".to_string()),
                starts_at,
                ends_at: Some(starts_at + Duration::hours(end_offset_hours)),
                capacity,
                status: None,
            }
        }

        /// Expect the created event to be returned
        #[tokio::test]
        async fn creates_event() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Event)?;

            let event = EventService::new(&test.db)
                .create(new_event(3, Some(40)))
                .await
                .unwrap();

            assert_eq!(event.title, "Charity Dinner");
            assert_eq!(event.capacity, Some(40));

            Ok(())
        }

        /// Expect EndsBeforeStart when the end precedes the start
        #[tokio::test]
        async fn rejects_end_before_start() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Event)?;

            let result = EventService::new(&test.db)
                .create(new_event(-1, None))
                .await;

            assert!(matches!(
                result,
                Err(Error::EventError(EventError::EndsBeforeStart))
            ));

            Ok(())
        }

        /// Expect NegativeCapacity for a capacity below zero
        #[tokio::test]
        async fn rejects_negative_capacity() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Event)?;

            let result = EventService::new(&test.db)
                .create(new_event(1, Some(-5)))
                .await;

            assert!(matches!(
                result,
                Err(Error::EventError(EventError::NegativeCapacity(-5)))
            ));

            Ok(())
        }
    }

    mod update {
        use chrono::Duration;
        use lionsclub_test_utils::prelude::*;

        use crate::{
            model::event::UpdateEventDto,
            server::{
                error::{event::EventError, Error},
                service::event::EventService,
            },
        };

        /// Expect the new end time to be validated against the stored start time
        #[tokio::test]
        async fn validates_against_stored_start() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::Event)?;
            let event = test.event().insert_event("Picnic", None).await?;

            let result = EventService::new(&test.db)
                .update(
                    event.id,
                    UpdateEventDto {
                        ends_at: Some(event.starts_at - Duration::hours(1)),
                        ..Default::default()
                    },
                )
                .await;

            assert!(matches!(
                result,
                Err(Error::EventError(EventError::EndsBeforeStart))
            ));

            Ok(())
        }

        /// Expect NotFound for an unknown event
        #[tokio::test]
        async fn fails_for_unknown_event() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Event)?;

            let result = EventService::new(&test.db)
                .update(9, UpdateEventDto::default())
                .await;

            assert!(matches!(
                result,
                Err(Error::EventError(EventError::NotFound(9)))
            ));

            Ok(())
        }
    }

    mod get_detail {
        use entity::sea_orm_active_enums::RegistrationStatus;
        use lionsclub_test_utils::prelude::*;

        use crate::server::service::event::EventService;

        /// Expect counters to reflect registrations and check-ins
        #[tokio::test]
        async fn counts_attendance() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_core_tables().build().await?;
            let alice = test.member().insert_member("Alice", None).await?;
            let bob = test.member().insert_member("Bob", None).await?;
            let carol = test.member().insert_member("Carol", None).await?;
            let event = test.event().insert_event("Gala", Some(2)).await?;
            test.event()
                .insert_registration(alice.id, event.id, RegistrationStatus::Confirmed)
                .await?;
            test.event()
                .insert_registration(bob.id, event.id, RegistrationStatus::Confirmed)
                .await?;
            test.event()
                .insert_registration(carol.id, event.id, RegistrationStatus::Waitlist)
                .await?;
            test.event().insert_checkin(alice.id, event.id).await?;

            let detail = EventService::new(&test.db)
                .get_detail(event.id)
                .await
                .unwrap();

            assert_eq!(detail.confirmed_count, 2);
            assert_eq!(detail.waitlist_count, 1);
            assert_eq!(detail.checkin_count, 1);
            assert_eq!(detail.spots_left, Some(0));

            Ok(())
        }
    }
}
