use chrono::Utc;
use entity::sea_orm_active_enums::RegistrationStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

/// Filters for listing registrations
#[derive(Clone, Debug, Default)]
pub struct RegistrationFilter {
    pub member_id: Option<i32>,
    pub event_id: Option<i32>,
    pub status: Option<RegistrationStatus>,
}

pub struct RegistrationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RegistrationRepository<'a, C> {
    /// Creates a new instance of [`RegistrationRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        member_id: i32,
        event_id: i32,
        status: RegistrationStatus,
        notes: Option<String>,
    ) -> Result<entity::registration::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let registration = entity::registration::ActiveModel {
            member_id: ActiveValue::Set(member_id),
            event_id: ActiveValue::Set(event_id),
            status: ActiveValue::Set(status),
            notes: ActiveValue::Set(notes),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        registration.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::registration::Model>, DbErr> {
        entity::prelude::Registration::find_by_id(id)
            .one(self.db)
            .await
    }

    /// The member's registration for an event regardless of its status
    pub async fn find_by_member_and_event(
        &self,
        member_id: i32,
        event_id: i32,
    ) -> Result<Option<entity::registration::Model>, DbErr> {
        entity::prelude::Registration::find()
            .filter(entity::registration::Column::MemberId.eq(member_id))
            .filter(entity::registration::Column::EventId.eq(event_id))
            .one(self.db)
            .await
    }

    /// Lists registrations ordered by creation time
    pub async fn list(
        &self,
        filter: &RegistrationFilter,
    ) -> Result<Vec<entity::registration::Model>, DbErr> {
        let mut condition = Condition::all();

        if let Some(member_id) = filter.member_id {
            condition = condition.add(entity::registration::Column::MemberId.eq(member_id));
        }
        if let Some(event_id) = filter.event_id {
            condition = condition.add(entity::registration::Column::EventId.eq(event_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(entity::registration::Column::Status.eq(status));
        }

        entity::prelude::Registration::find()
            .filter(condition)
            .order_by_asc(entity::registration::Column::CreatedAt)
            .order_by_asc(entity::registration::Column::Id)
            .all(self.db)
            .await
    }

    /// Sets status and optionally notes of a registration
    pub async fn update_status(
        &self,
        registration: entity::registration::Model,
        status: RegistrationStatus,
        notes: Option<String>,
    ) -> Result<entity::registration::Model, DbErr> {
        let mut registration = registration.into_active_model();
        registration.status = ActiveValue::Set(status);
        if let Some(notes) = notes {
            registration.notes = ActiveValue::Set(Some(notes));
        }
        registration.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        registration.update(self.db).await
    }

    /// Oldest waitlisted registration of an event, next in line for a confirmed place
    pub async fn oldest_waitlisted(
        &self,
        event_id: i32,
    ) -> Result<Option<entity::registration::Model>, DbErr> {
        entity::prelude::Registration::find()
            .filter(entity::registration::Column::EventId.eq(event_id))
            .filter(entity::registration::Column::Status.eq(RegistrationStatus::Waitlist))
            .order_by_asc(entity::registration::Column::CreatedAt)
            .order_by_asc(entity::registration::Column::Id)
            .one(self.db)
            .await
    }

    pub async fn count_by_event_and_status(
        &self,
        event_id: i32,
        status: RegistrationStatus,
    ) -> Result<u64, DbErr> {
        entity::prelude::Registration::find()
            .filter(entity::registration::Column::EventId.eq(event_id))
            .filter(entity::registration::Column::Status.eq(status))
            .count(self.db)
            .await
    }

    /// Number of registrations which are not cancelled
    pub async fn count_active(&self) -> Result<u64, DbErr> {
        entity::prelude::Registration::find()
            .filter(entity::registration::Column::Status.ne(RegistrationStatus::Cancelled))
            .count(self.db)
            .await
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        entity::prelude::Registration::find().count(self.db).await
    }
}
