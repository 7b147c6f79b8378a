use crate::server::{
    data::checkin::CheckinRepository,
    error::{checkin::CheckinError, Error},
    service::checkin::CheckinService,
};

use super::*;

/// Expect the check-in row to be removed
#[tokio::test]
async fn deletes_checkin() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_core_tables().build().await?;
    let member = test.member().insert_member("Alice", None).await?;
    let event = test.event().insert_event("Workshop", None).await?;
    let checkin = test.event().insert_checkin(member.id, event.id).await?;

    let result = CheckinService::new(&test.db).undo(checkin.id).await;

    assert!(result.is_ok());
    let remaining = CheckinRepository::new(&test.db).get(checkin.id).await?;
    assert!(remaining.is_none());

    Ok(())
}

/// Expect NotFound for an unknown check-in
#[tokio::test]
async fn fails_for_unknown_checkin() -> Result<(), TestError> {
    let test = TestBuilder::new().with_core_tables().build().await?;

    let result = CheckinService::new(&test.db).undo(5).await;

    assert!(matches!(
        result,
        Err(Error::CheckinError(CheckinError::NotFound(5)))
    ));

    Ok(())
}
