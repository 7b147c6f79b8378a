//! Tests for the check-in endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use lionsclub::{
    model::checkin::CreateCheckinDto,
    server::{
        controller::checkin::{create_checkin, delete_checkin},
        model::session::admin::SessionAdmin,
    },
};

use super::*;

fn request(line_user_id: &str, event_id: i32) -> Json<CreateCheckinDto> {
    Json(CreateCheckinDto {
        member_id: None,
        line_user_id: Some(line_user_id.to_string()),
        event_id,
        device_info: Some("kiosk".to_string()),
    })
}

/// Expect 201 for the first check-in and 409 for a repeated one
#[tokio::test]
async fn repeated_checkin_conflicts() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_core_tables().build().await?;
    let dirs = TestDirs::new();
    test.member().insert_member("Alice", Some("U1")).await?;
    let event = test.event().insert_event("Monthly Meeting", None).await?;

    let first = create_checkin(State(test.into_app_state(&dirs)), request("U1", event.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = create_checkin(State(test.into_app_state(&dirs)), request("U1", event.id)).await;
    assert!(second.is_err());
    assert_eq!(
        second.err().unwrap().into_response().status(),
        StatusCode::CONFLICT
    );

    Ok(())
}

/// Expect 400 when both member_id and line_user_id are given
#[tokio::test]
async fn ambiguous_member_reference_is_rejected() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_core_tables().build().await?;
    let dirs = TestDirs::new();
    let member = test.member().insert_member("Alice", Some("U1")).await?;
    let event = test.event().insert_event("Monthly Meeting", None).await?;

    let result = create_checkin(
        State(test.into_app_state(&dirs)),
        Json(CreateCheckinDto {
            member_id: Some(member.id),
            line_user_id: Some("U1".to_string()),
            event_id: event.id,
            device_info: None,
        }),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}

/// Expect undoing a check-in to require an admin session
#[tokio::test]
async fn undo_requires_admin() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_core_tables().build().await?;
    let dirs = TestDirs::new();
    let member = test.member().insert_member("Alice", None).await?;
    let event = test.event().insert_event("Monthly Meeting", None).await?;
    let checkin = test.event().insert_checkin(member.id, event.id).await?;

    let denied = delete_checkin(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        Path(checkin.id),
    )
    .await;
    assert_eq!(
        denied.err().unwrap().into_response().status(),
        StatusCode::UNAUTHORIZED
    );

    SessionAdmin::insert(&test.session).await.unwrap();
    let resp = delete_checkin(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        Path(checkin.id),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    Ok(())
}
