use chrono::{NaiveDateTime, Utc};
use entity::sea_orm_active_enums::AnnouncementStatus;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        announcement::{
            AnnouncementDto, CreateAnnouncementDto, PublishResultDto, UpdateAnnouncementDto,
        },
        push::{PushTargetDto, SendPushDto},
    },
    server::{
        data::announcement::AnnouncementRepository,
        error::Error,
        line::LineClient,
        model::db::AnnouncementModel,
        service::push::PushService,
    },
};

fn not_found() -> Error {
    Error::NotFound("Announcement".to_string())
}

fn already_published() -> Error {
    Error::Conflict("Announcement is already published".to_string())
}

pub struct AnnouncementService<'a> {
    db: &'a DatabaseConnection,
    line: &'a LineClient,
}

impl<'a> AnnouncementService<'a> {
    /// Creates a new instance of [`AnnouncementService`]
    pub fn new(db: &'a DatabaseConnection, line: &'a LineClient) -> Self {
        Self { db, line }
    }

    /// Lists announcements, drafts and scheduled ones only when `include_unpublished` is set
    pub async fn list(&self, include_unpublished: bool) -> Result<Vec<AnnouncementDto>, Error> {
        let announcements = AnnouncementRepository::new(self.db)
            .list(!include_unpublished)
            .await?;

        Ok(announcements
            .into_iter()
            .map(AnnouncementDto::from)
            .collect())
    }

    /// Gets an announcement, unpublished ones are hidden unless `include_unpublished` is set
    pub async fn get(
        &self,
        announcement_id: i32,
        include_unpublished: bool,
    ) -> Result<AnnouncementDto, Error> {
        let announcement = AnnouncementRepository::new(self.db)
            .get(announcement_id)
            .await?
            .filter(|a| include_unpublished || a.status == AnnouncementStatus::Published)
            .ok_or_else(not_found)?;

        Ok(announcement.into())
    }

    pub async fn create(&self, announcement: CreateAnnouncementDto) -> Result<AnnouncementDto, Error> {
        if announcement.title.trim().is_empty() || announcement.content.trim().is_empty() {
            return Err(Error::Validation(
                "title and content must not be empty".to_string(),
            ));
        }

        let announcement = AnnouncementRepository::new(self.db)
            .create(announcement)
            .await?;

        Ok(announcement.into())
    }

    pub async fn update(
        &self,
        announcement_id: i32,
        changes: UpdateAnnouncementDto,
    ) -> Result<AnnouncementDto, Error> {
        let announcement = AnnouncementRepository::new(self.db)
            .update(announcement_id, changes)
            .await?
            .ok_or_else(not_found)?;

        Ok(announcement.into())
    }

    pub async fn delete(&self, announcement_id: i32) -> Result<(), Error> {
        let result = AnnouncementRepository::new(self.db)
            .delete(announcement_id)
            .await?;

        if result.rows_affected == 0 {
            return Err(not_found());
        }

        Ok(())
    }

    /// Publishes an announcement now, pushing it to LINE when `push_to_line` is set
    ///
    /// # Returns
    /// - `Ok(PublishResultDto)` - The published announcement and the push record, if any
    /// - `Err(Error::NotFound)` - Unknown announcement
    /// - `Err(Error::Conflict)` - Already published
    pub async fn publish(&self, announcement_id: i32) -> Result<PublishResultDto, Error> {
        let announcement = AnnouncementRepository::new(self.db)
            .get(announcement_id)
            .await?
            .ok_or_else(not_found)?;

        if announcement.status == AnnouncementStatus::Published {
            return Err(already_published());
        }

        self.publish_model(announcement, Utc::now().naive_utc())
            .await
    }

    /// Publishes every scheduled announcement due at `now`
    ///
    /// Failures are logged per announcement so one bad announcement doesn't block the rest.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of announcements published
    pub async fn publish_due(&self, now: NaiveDateTime) -> Result<usize, Error> {
        let due = AnnouncementRepository::new(self.db).find_due(now).await?;
        let mut published = 0;

        for announcement in due {
            let announcement_id = announcement.id;

            match self.publish_model(announcement, now).await {
                Ok(_) => published += 1,
                Err(Error::Conflict(_)) => tracing::debug!(
                    announcement_id = %announcement_id,
                    "Scheduled announcement was already published"
                ),
                Err(e) => tracing::error!(
                    announcement_id = %announcement_id,
                    "Failed to publish scheduled announcement: {}",
                    e
                ),
            }
        }

        Ok(published)
    }

    async fn publish_model(
        &self,
        announcement: AnnouncementModel,
        now: NaiveDateTime,
    ) -> Result<PublishResultDto, Error> {
        // Lost a race against another publisher, which also handles the push
        let Some(announcement) = AnnouncementRepository::new(self.db)
            .mark_published(announcement.id, now)
            .await?
        else {
            return Err(already_published());
        };

        tracing::info!(announcement_id = %announcement.id, "Published announcement");

        let push_record_id = if announcement.push_to_line {
            let result = PushService::new(self.db, self.line)
                .send(SendPushDto {
                    target: PushTargetDto::All,
                    title: Some(announcement.title.clone()),
                    message: Some(announcement.content.clone()),
                    template_id: None,
                    event_id: None,
                })
                .await;

            match result {
                Ok(record) => Some(record.id),
                Err(Error::Validation(reason)) => {
                    tracing::warn!(
                        announcement_id = %announcement.id,
                        "Announcement not pushed: {}",
                        reason
                    );
                    None
                }
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        Ok(PublishResultDto {
            announcement: announcement.into(),
            push_record_id,
        })
    }
}
