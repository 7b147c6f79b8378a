use chrono::{NaiveDateTime, Utc};
use entity::sea_orm_active_enums::AnnouncementStatus;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    DeleteResult, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::model::announcement::{CreateAnnouncementDto, UpdateAnnouncementDto};

pub struct AnnouncementRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AnnouncementRepository<'a, C> {
    /// Creates a new instance of [`AnnouncementRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates an announcement, `scheduled` when a publish time is given, otherwise `draft`
    pub async fn create(
        &self,
        announcement: CreateAnnouncementDto,
    ) -> Result<entity::announcement::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let status = match announcement.scheduled_at {
            Some(_) => AnnouncementStatus::Scheduled,
            None => AnnouncementStatus::Draft,
        };

        let announcement = entity::announcement::ActiveModel {
            title: ActiveValue::Set(announcement.title),
            content: ActiveValue::Set(announcement.content),
            status: ActiveValue::Set(status),
            push_to_line: ActiveValue::Set(announcement.push_to_line),
            scheduled_at: ActiveValue::Set(announcement.scheduled_at),
            published_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        announcement.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::announcement::Model>, DbErr> {
        entity::prelude::Announcement::find_by_id(id)
            .one(self.db)
            .await
    }

    /// Lists announcements, newest first, optionally only published ones
    pub async fn list(
        &self,
        published_only: bool,
    ) -> Result<Vec<entity::announcement::Model>, DbErr> {
        let mut query = entity::prelude::Announcement::find();

        if published_only {
            query = query
                .filter(entity::announcement::Column::Status.eq(AnnouncementStatus::Published));
        }

        query
            .order_by_desc(entity::announcement::Column::CreatedAt)
            .order_by_desc(entity::announcement::Column::Id)
            .all(self.db)
            .await
    }

    /// Scheduled announcements whose publish time has passed
    pub async fn find_due(
        &self,
        now: NaiveDateTime,
    ) -> Result<Vec<entity::announcement::Model>, DbErr> {
        entity::prelude::Announcement::find()
            .filter(entity::announcement::Column::Status.eq(AnnouncementStatus::Scheduled))
            .filter(entity::announcement::Column::ScheduledAt.lte(now))
            .order_by_asc(entity::announcement::Column::ScheduledAt)
            .all(self.db)
            .await
    }

    /// Applies the fields present in `changes`
    ///
    /// Returns `Ok(None)` when the announcement does not exist.
    pub async fn update(
        &self,
        id: i32,
        changes: UpdateAnnouncementDto,
    ) -> Result<Option<entity::announcement::Model>, DbErr> {
        let Some(announcement) = self.get(id).await? else {
            return Ok(None);
        };

        let mut announcement = announcement.into_active_model();

        if let Some(title) = changes.title {
            announcement.title = ActiveValue::Set(title);
        }
        if let Some(content) = changes.content {
            announcement.content = ActiveValue::Set(content);
        }
        if let Some(push_to_line) = changes.push_to_line {
            announcement.push_to_line = ActiveValue::Set(push_to_line);
        }
        if let Some(scheduled_at) = changes.scheduled_at {
            announcement.scheduled_at = ActiveValue::Set(Some(scheduled_at));
        }
        if let Some(status) = changes.status {
            announcement.status = ActiveValue::Set(status);
        }
        announcement.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(announcement.update(self.db).await?))
    }

    /// Marks an announcement as published at `now` unless it already is
    ///
    /// The status check is part of the UPDATE, of two concurrent publishers only one
    /// gets the announcement back.
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - This call published the announcement
    /// - `Ok(None)` - Already published, or no announcement with this ID
    pub async fn mark_published(
        &self,
        id: i32,
        now: NaiveDateTime,
    ) -> Result<Option<entity::announcement::Model>, DbErr> {
        let result = entity::prelude::Announcement::update_many()
            .col_expr(
                entity::announcement::Column::Status,
                Expr::value(AnnouncementStatus::Published),
            )
            .col_expr(entity::announcement::Column::PublishedAt, Expr::value(now))
            .col_expr(entity::announcement::Column::UpdatedAt, Expr::value(now))
            .filter(entity::announcement::Column::Id.eq(id))
            .filter(entity::announcement::Column::Status.ne(AnnouncementStatus::Published))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Deletes an announcement
    ///
    /// Returns OK regardless of the announcement existing, check
    /// [`DeleteResult::rows_affected`] to confirm the deletion.
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Announcement::delete_by_id(id)
            .exec(self.db)
            .await
    }
}
