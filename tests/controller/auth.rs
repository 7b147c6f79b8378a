//! Tests for the admin login, logout and session endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use lionsclub::{
    model::auth::LoginDto,
    server::{
        controller::auth::{get_session, login, logout},
        model::session::admin::SessionAdmin,
    },
};

use super::*;

/// Expect 200 and an admin session after logging in with the configured password
#[tokio::test]
async fn login_with_valid_password_marks_session() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let dirs = TestDirs::new();

    let result = login(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        Json(LoginDto {
            password: TEST_ADMIN_PASSWORD.to_string(),
        }),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(SessionAdmin::is_admin(&test.session).await.unwrap());

    Ok(())
}

/// Expect 401 and no admin session after logging in with a wrong password
#[tokio::test]
async fn login_with_wrong_password_is_rejected() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let dirs = TestDirs::new();

    let result = login(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        Json(LoginDto {
            password: "wrong".to_string(),
        }),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(!SessionAdmin::is_admin(&test.session).await.unwrap());

    Ok(())
}

/// Expect logout to clear the admin flag
#[tokio::test]
async fn logout_clears_admin_session() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let dirs = TestDirs::new();
    SessionAdmin::insert(&test.session).await.unwrap();

    let result = logout(State(test.into_app_state(&dirs)), test.session.clone()).await;

    assert!(result.is_ok());
    assert!(!SessionAdmin::is_admin(&test.session).await.unwrap());

    Ok(())
}

/// Expect 200 for the session endpoint with or without an admin login
#[tokio::test]
async fn session_endpoint_always_succeeds() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;

    let resp = get_session(test.session.clone())
        .await
        .unwrap()
        .into_response();

    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}
