//! Event registrations with capacity enforcement.
//!
//! Registration changes run inside a database transaction which first locks the event
//! row. Changes to the same event are serialized by that lock, so the confirmed count
//! checked against the capacity can't be raced by a concurrent registration.

#[cfg(test)]
mod tests;

use entity::sea_orm_active_enums::RegistrationStatus;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, SqlErr, TransactionTrait};

use crate::{
    model::registration::RegistrationDto,
    server::{
        data::registration::{RegistrationFilter, RegistrationRepository},
        error::{registration::RegistrationError, Error},
        model::db::{EventModel, RegistrationModel},
        service::{
            event::resolve_event_for_update,
            member::{resolve_active_member, MemberRef},
        },
    },
};

/// Whether another confirmed place is available for `event`
async fn has_confirmed_place<C: ConnectionTrait>(
    db: &C,
    event: &EventModel,
) -> Result<bool, DbErr> {
    let Some(capacity) = event.capacity else {
        return Ok(true);
    };

    let confirmed = RegistrationRepository::new(db)
        .count_by_event_and_status(event.id, RegistrationStatus::Confirmed)
        .await?;

    Ok(confirmed < capacity.max(0) as u64)
}

/// Confirms the oldest waitlisted registration of an event, if any
async fn promote_waitlisted<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
) -> Result<Option<RegistrationModel>, DbErr> {
    let repo = RegistrationRepository::new(db);

    let Some(next) = repo.oldest_waitlisted(event_id).await? else {
        return Ok(None);
    };

    let promoted = repo
        .update_status(next, RegistrationStatus::Confirmed, None)
        .await?;

    tracing::info!(
        registration_id = %promoted.id,
        member_id = %promoted.member_id,
        event_id = %event_id,
        "Promoted waitlisted registration"
    );

    Ok(Some(promoted))
}

pub struct RegistrationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RegistrationService<'a> {
    /// Creates a new instance of [`RegistrationService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a member for an event
    ///
    /// A previously cancelled registration is re-activated in place. The registration is
    /// `confirmed` while the event has room and `waitlist` once confirmed registrations
    /// reach capacity.
    ///
    /// # Returns
    /// - `Ok(RegistrationDto)` - The new or re-activated registration
    /// - `Err(Error::MemberError)` - Member not found (404) or not active (403)
    /// - `Err(Error::EventError(EventError::NotFound))` - Event not found (404)
    /// - `Err(Error::RegistrationError(RegistrationError::EventNotOpen))` - Event cancelled or completed (400)
    /// - `Err(Error::RegistrationError(RegistrationError::AlreadyRegistered))` - Active registration exists (409)
    pub async fn register(
        &self,
        member_ref: MemberRef,
        event_id: i32,
        notes: Option<String>,
    ) -> Result<RegistrationDto, Error> {
        let txn = self.db.begin().await?;

        let member = resolve_active_member(&txn, &member_ref).await?;
        let event = resolve_event_for_update(&txn, event_id).await?;

        if !event.status.is_open() {
            return Err(RegistrationError::EventNotOpen(event.id).into());
        }

        let already_registered = RegistrationError::AlreadyRegistered {
            member_id: member.id,
            event_id: event.id,
        };

        let repo = RegistrationRepository::new(&txn);
        let existing = repo.find_by_member_and_event(member.id, event.id).await?;

        let existing = match existing {
            Some(registration) if registration.status != RegistrationStatus::Cancelled => {
                return Err(already_registered.into());
            }
            existing => existing,
        };

        let status = if has_confirmed_place(&txn, &event).await? {
            RegistrationStatus::Confirmed
        } else {
            RegistrationStatus::Waitlist
        };

        let registration = match existing {
            Some(cancelled) => repo.update_status(cancelled, status, notes).await?,
            None => repo
                .create(member.id, event.id, status, notes)
                .await
                .map_err(|e| match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => Error::from(already_registered),
                    _ => Error::from(e),
                })?,
        };

        txn.commit().await?;

        tracing::info!(
            member_id = %member.id,
            event_id = %event.id,
            status = ?registration.status,
            "Member registered for event"
        );

        Ok(registration.into())
    }

    pub async fn list(&self, filter: RegistrationFilter) -> Result<Vec<RegistrationDto>, Error> {
        let registrations = RegistrationRepository::new(self.db).list(&filter).await?;

        Ok(registrations
            .into_iter()
            .map(RegistrationDto::from)
            .collect())
    }

    /// Sets the status of a registration
    ///
    /// Confirming is refused with [`RegistrationError::EventFull`] when the event has no
    /// confirmed place left. Moving a confirmed registration to any other status frees its
    /// place for the oldest waitlisted registration.
    pub async fn update_status(
        &self,
        registration_id: i32,
        status: RegistrationStatus,
        notes: Option<String>,
    ) -> Result<RegistrationDto, Error> {
        let txn = self.db.begin().await?;
        let repo = RegistrationRepository::new(&txn);

        let event_id = repo
            .get(registration_id)
            .await?
            .ok_or(RegistrationError::NotFound(registration_id))?
            .event_id;
        let event = resolve_event_for_update(&txn, event_id).await?;

        // Re-read under the event lock, a concurrent change may have moved it
        let registration = repo
            .get(registration_id)
            .await?
            .ok_or(RegistrationError::NotFound(registration_id))?;
        let previous = registration.status;

        if status == RegistrationStatus::Confirmed && previous != RegistrationStatus::Confirmed {
            if !has_confirmed_place(&txn, &event).await? {
                return Err(RegistrationError::EventFull(event.id).into());
            }
        }

        let registration = repo.update_status(registration, status, notes).await?;

        if previous == RegistrationStatus::Confirmed && status != RegistrationStatus::Confirmed {
            promote_waitlisted(&txn, registration.event_id).await?;
        }

        txn.commit().await?;

        tracing::info!(
            registration_id = %registration.id,
            "Registration status changed from {:?} to {:?}",
            previous,
            status
        );

        Ok(registration.into())
    }

    /// Cancels a registration, promoting the oldest waitlisted registration when a
    /// confirmed place was freed
    pub async fn cancel(&self, registration_id: i32) -> Result<RegistrationDto, Error> {
        self.update_status(registration_id, RegistrationStatus::Cancelled, None)
            .await
    }
}
