use entity::sea_orm_active_enums::RegistrationStatus;

use crate::server::{
    data::registration::RegistrationRepository,
    error::{registration::RegistrationError, Error},
    service::registration::RegistrationService,
};

use super::*;

/// Expect cancelling a confirmed registration to promote the oldest waitlisted one
#[tokio::test]
async fn promotes_oldest_waitlisted() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_core_tables().build().await?;
    let alice = test.member().insert_member("Alice", None).await?;
    let bob = test.member().insert_member("Bob", None).await?;
    let carol = test.member().insert_member("Carol", None).await?;
    let event = test.event().insert_event("Gala", Some(1)).await?;
    let confirmed = test
        .event()
        .insert_registration(alice.id, event.id, RegistrationStatus::Confirmed)
        .await?;
    let first_waiting = test
        .event()
        .insert_registration(bob.id, event.id, RegistrationStatus::Waitlist)
        .await?;
    let second_waiting = test
        .event()
        .insert_registration(carol.id, event.id, RegistrationStatus::Waitlist)
        .await?;

    let cancelled = RegistrationService::new(&test.db)
        .cancel(confirmed.id)
        .await
        .unwrap();

    assert_eq!(cancelled.status, RegistrationStatus::Cancelled);
    let repo = RegistrationRepository::new(&test.db);
    let first_waiting = repo.get(first_waiting.id).await?.unwrap();
    let second_waiting = repo.get(second_waiting.id).await?.unwrap();
    assert_eq!(first_waiting.status, RegistrationStatus::Confirmed);
    assert_eq!(second_waiting.status, RegistrationStatus::Waitlist);

    Ok(())
}

/// Expect no promotion when a waitlisted registration is cancelled
#[tokio::test]
async fn does_not_promote_when_waitlisted_cancels() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_core_tables().build().await?;
    let alice = test.member().insert_member("Alice", None).await?;
    let bob = test.member().insert_member("Bob", None).await?;
    let carol = test.member().insert_member("Carol", None).await?;
    let event = test.event().insert_event("Gala", Some(1)).await?;
    test.event()
        .insert_registration(alice.id, event.id, RegistrationStatus::Confirmed)
        .await?;
    let leaving = test
        .event()
        .insert_registration(bob.id, event.id, RegistrationStatus::Waitlist)
        .await?;
    let staying = test
        .event()
        .insert_registration(carol.id, event.id, RegistrationStatus::Waitlist)
        .await?;

    RegistrationService::new(&test.db)
        .cancel(leaving.id)
        .await
        .unwrap();

    let staying = RegistrationRepository::new(&test.db)
        .get(staying.id)
        .await?
        .unwrap();
    assert_eq!(staying.status, RegistrationStatus::Waitlist);

    Ok(())
}

/// Expect NotFound for an unknown registration
#[tokio::test]
async fn fails_for_unknown_registration() -> Result<(), TestError> {
    let test = TestBuilder::new().with_core_tables().build().await?;

    let result = RegistrationService::new(&test.db).cancel(3).await;

    assert!(matches!(
        result,
        Err(Error::RegistrationError(RegistrationError::NotFound(3)))
    ));

    Ok(())
}
