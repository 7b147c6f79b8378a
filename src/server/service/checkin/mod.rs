//! Check-in creation and undo.
//!
//! [`CheckinService::check_in`] is the single implementation of the check-in rules
//! used by the REST API, the LIFF app and the LINE bot.

#[cfg(test)]
mod tests;

use entity::sea_orm_active_enums::RegistrationStatus;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::{
    model::checkin::{CheckinDto, CheckinResultDto},
    server::{
        data::{checkin::CheckinRepository, registration::RegistrationRepository},
        error::{checkin::CheckinError, Error},
        service::{event::resolve_event, member::resolve_active_member, member::MemberRef},
    },
};

pub struct CheckinService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CheckinService<'a> {
    /// Creates a new instance of [`CheckinService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Checks a member in to an event
    ///
    /// Walk-ins without a registration are admitted while the event has room; members
    /// holding a confirmed registration are always admitted. Existing registrations are
    /// left untouched.
    ///
    /// # Arguments
    /// - `member_ref` - Member to check in, by ID or LINE user ID
    /// - `event_id` - Event to check in to
    /// - `device_info` - Free-form description of the client that performed the check-in
    ///
    /// # Returns
    /// - `Ok(CheckinResultDto)` - The stored check-in with member and event summaries
    /// - `Err(Error::MemberError)` - Member not found (404) or not active (403)
    /// - `Err(Error::EventError(EventError::NotFound))` - Event not found (404)
    /// - `Err(Error::CheckinError(CheckinError::EventNotOpen))` - Event cancelled or completed (400)
    /// - `Err(Error::CheckinError(CheckinError::AlreadyCheckedIn))` - Duplicate check-in (409)
    /// - `Err(Error::CheckinError(CheckinError::EventFull))` - Walk-in rejected at capacity (409)
    pub async fn check_in(
        &self,
        member_ref: MemberRef,
        event_id: i32,
        device_info: Option<String>,
    ) -> Result<CheckinResultDto, Error> {
        let member = resolve_active_member(self.db, &member_ref).await?;
        let event = resolve_event(self.db, event_id).await?;

        if !event.status.is_open() {
            return Err(CheckinError::EventNotOpen(event.id).into());
        }

        let checkins = CheckinRepository::new(self.db);
        let already_checked_in = CheckinError::AlreadyCheckedIn {
            member_id: member.id,
            event_id: event.id,
        };

        if checkins
            .find_by_member_and_event(member.id, event.id)
            .await?
            .is_some()
        {
            return Err(already_checked_in.into());
        }

        let registration = RegistrationRepository::new(self.db)
            .find_by_member_and_event(member.id, event.id)
            .await?;
        let confirmed = matches!(
            registration,
            Some(ref registration) if registration.status == RegistrationStatus::Confirmed
        );

        if let (Some(capacity), false) = (event.capacity, confirmed) {
            let count = checkins.count_by_event(event.id).await?;

            if count >= capacity.max(0) as u64 {
                tracing::warn!(
                    member_id = %member.id,
                    event_id = %event.id,
                    "Walk-in rejected, event at capacity ({}/{})",
                    count,
                    capacity
                );

                return Err(CheckinError::EventFull(event.id).into());
            }
        }

        // The unique (member_id, event_id) index settles concurrent duplicates
        let checkin = checkins
            .create(member.id, event.id, device_info)
            .await
            .map_err(|e: DbErr| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Error::from(already_checked_in),
                _ => Error::from(e),
            })?;

        tracing::info!(
            member_id = %member.id,
            event_id = %event.id,
            walk_in = !confirmed,
            "Member checked in"
        );

        Ok(CheckinResultDto {
            id: checkin.id,
            checked_in_at: checkin.checked_in_at,
            device_info: checkin.device_info,
            member: (&member).into(),
            event: (&event).into(),
        })
    }

    /// Lists check-ins, optionally filtered by event and member
    pub async fn list(
        &self,
        event_id: Option<i32>,
        member_id: Option<i32>,
    ) -> Result<Vec<CheckinDto>, Error> {
        let checkins = CheckinRepository::new(self.db)
            .list(event_id, member_id)
            .await?;

        Ok(checkins.into_iter().map(CheckinDto::from).collect())
    }

    /// Deletes a check-in
    ///
    /// # Returns
    /// - `Ok(())` - The check-in was deleted
    /// - `Err(Error::CheckinError(CheckinError::NotFound))` - No check-in with this ID
    pub async fn undo(&self, checkin_id: i32) -> Result<(), Error> {
        let result = CheckinRepository::new(self.db).delete(checkin_id).await?;

        if result.rows_affected == 0 {
            return Err(CheckinError::NotFound(checkin_id).into());
        }

        tracing::info!(checkin_id = %checkin_id, "Check-in undone");

        Ok(())
    }
}
