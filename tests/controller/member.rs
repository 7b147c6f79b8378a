//! Tests for the member endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::MemberStatus;
use lionsclub::{
    model::member::CreateMemberDto,
    server::{
        controller::member::{create_member, delete_member, list_members, MemberQuery},
        model::session::admin::SessionAdmin,
    },
};
use sea_orm::EntityTrait;

use super::*;

fn new_member(name: &str) -> Json<CreateMemberDto> {
    Json(CreateMemberDto {
        name: name.to_string(),
        email: None,
        phone: None,
        line_user_id: None,
        role: None,
        joined_on: None,
    })
}

/// Expect 401 when listing members without an admin session
#[tokio::test]
async fn list_requires_admin() -> Result<(), TestError> {
    let test = TestBuilder::new().with_core_tables().build().await?;
    let dirs = TestDirs::new();

    let result = list_members(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        Query(MemberQuery::default()),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::UNAUTHORIZED
    );

    Ok(())
}

/// Expect 201 on create and the new member to be listed for an admin
#[tokio::test]
async fn admin_creates_and_lists_members() -> Result<(), TestError> {
    let test = TestBuilder::new().with_core_tables().build().await?;
    let dirs = TestDirs::new();
    SessionAdmin::insert(&test.session).await.unwrap();

    let created = create_member(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        new_member("Alice"),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = list_members(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        Query(MemberQuery::default()),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(listed.status(), StatusCode::OK);

    Ok(())
}

/// Expect a blank name to be rejected with 400
#[tokio::test]
async fn blank_name_is_rejected() -> Result<(), TestError> {
    let test = TestBuilder::new().with_core_tables().build().await?;
    let dirs = TestDirs::new();
    SessionAdmin::insert(&test.session).await.unwrap();

    let result = create_member(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        new_member("   "),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}

/// Expect delete to deactivate the member instead of removing the row
#[tokio::test]
async fn delete_deactivates_member() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_core_tables().build().await?;
    let dirs = TestDirs::new();
    let member = test.member().insert_member("Alice", None).await?;
    SessionAdmin::insert(&test.session).await.unwrap();

    let resp = delete_member(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        Path(member.id),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = entity::prelude::Member::find_by_id(member.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(stored.status, MemberStatus::Inactive);

    Ok(())
}
