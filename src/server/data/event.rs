use chrono::{NaiveDateTime, Utc};
use entity::sea_orm_active_enums::EventStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::model::event::{CreateEventDto, UpdateEventDto};

/// Select of a single event taking an exclusive row lock (`FOR UPDATE`)
fn select_for_update(id: i32) -> Select<entity::event::Entity> {
    entity::prelude::Event::find_by_id(id).lock_exclusive()
}

pub struct EventRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventRepository<'a, C> {
    /// Creates a new instance of [`EventRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new event, status defaults to [`EventStatus::Upcoming`]
    pub async fn create(&self, event: CreateEventDto) -> Result<entity::event::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let event = entity::event::ActiveModel {
            title: ActiveValue::Set(event.title),
            description: ActiveValue::Set(event.description),
            location: ActiveValue::Set(event.location),
            starts_at: ActiveValue::Set(event.starts_at),
            ends_at: ActiveValue::Set(event.ends_at),
            capacity: ActiveValue::Set(event.capacity),
            status: ActiveValue::Set(event.status.unwrap_or(EventStatus::Upcoming)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        event.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::event::Model>, DbErr> {
        entity::prelude::Event::find_by_id(id).one(self.db).await
    }

    /// Fetches an event and locks its row until the surrounding transaction ends
    ///
    /// Concurrent capacity decisions for the same event queue up behind the lock.
    /// SQLite has no row locks and serializes writers instead.
    pub async fn get_for_update(&self, id: i32) -> Result<Option<entity::event::Model>, DbErr> {
        select_for_update(id).one(self.db).await
    }

    /// Lists events ordered by start time
    ///
    /// # Arguments
    /// - `status` - Only events with this status
    /// - `upcoming_after` - Only events starting at or after this time which are not cancelled or completed
    pub async fn list(
        &self,
        status: Option<EventStatus>,
        upcoming_after: Option<NaiveDateTime>,
    ) -> Result<Vec<entity::event::Model>, DbErr> {
        let mut query = entity::prelude::Event::find();

        if let Some(status) = status {
            query = query.filter(entity::event::Column::Status.eq(status));
        }
        if let Some(after) = upcoming_after {
            query = query
                .filter(entity::event::Column::StartsAt.gte(after))
                .filter(
                    entity::event::Column::Status
                        .is_in([EventStatus::Upcoming, EventStatus::Ongoing]),
                );
        }

        query
            .order_by_asc(entity::event::Column::StartsAt)
            .order_by_asc(entity::event::Column::Id)
            .all(self.db)
            .await
    }

    /// The next `limit` open events starting at or after `after`
    pub async fn list_upcoming(
        &self,
        after: NaiveDateTime,
        limit: u64,
    ) -> Result<Vec<entity::event::Model>, DbErr> {
        entity::prelude::Event::find()
            .filter(entity::event::Column::StartsAt.gte(after))
            .filter(entity::event::Column::Status.is_in([EventStatus::Upcoming, EventStatus::Ongoing]))
            .order_by_asc(entity::event::Column::StartsAt)
            .limit(limit)
            .all(self.db)
            .await
    }

    pub async fn count_upcoming(&self, after: NaiveDateTime) -> Result<u64, DbErr> {
        entity::prelude::Event::find()
            .filter(entity::event::Column::StartsAt.gte(after))
            .filter(entity::event::Column::Status.is_in([EventStatus::Upcoming, EventStatus::Ongoing]))
            .count(self.db)
            .await
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        entity::prelude::Event::find().count(self.db).await
    }

    /// Applies the fields present in `changes`
    ///
    /// Returns `Ok(None)` when the event does not exist.
    pub async fn update(
        &self,
        id: i32,
        changes: UpdateEventDto,
    ) -> Result<Option<entity::event::Model>, DbErr> {
        let Some(event) = self.get(id).await? else {
            return Ok(None);
        };

        let mut event = event.into_active_model();

        if let Some(title) = changes.title {
            event.title = ActiveValue::Set(title);
        }
        if let Some(description) = changes.description {
            event.description = ActiveValue::Set(Some(description));
        }
        if let Some(location) = changes.location {
            event.location = ActiveValue::Set(Some(location));
        }
        if let Some(starts_at) = changes.starts_at {
            event.starts_at = ActiveValue::Set(starts_at);
        }
        if let Some(ends_at) = changes.ends_at {
            event.ends_at = ActiveValue::Set(Some(ends_at));
        }
        if let Some(capacity) = changes.capacity {
            event.capacity = ActiveValue::Set(Some(capacity));
        }
        if let Some(status) = changes.status {
            event.status = ActiveValue::Set(status);
        }
        event.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(event.update(self.db).await?))
    }

    /// Sets the event's status, returns `Ok(None)` when the event does not exist
    pub async fn set_status(
        &self,
        id: i32,
        status: EventStatus,
    ) -> Result<Option<entity::event::Model>, DbErr> {
        self.update(
            id,
            UpdateEventDto {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }
}
