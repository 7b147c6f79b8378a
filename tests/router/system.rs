use axum::http::StatusCode;

use super::*;

/// Expect the liveness check to answer without touching the database
#[tokio::test]
async fn health_returns_ok() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let dirs = TestDirs::new();

    let resp = send(
        &test,
        &dirs,
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await)?;
    assert_eq!(body["status"], "ok");

    Ok(())
}

/// Expect the readiness check to report a reachable database
#[tokio::test]
async fn healthz_checks_database() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let dirs = TestDirs::new();

    let resp = send(
        &test,
        &dirs,
        Request::get("/healthz").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Expect admin endpoints to reject requests without a session cookie
#[tokio::test]
async fn admin_endpoint_without_session_is_unauthorized() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let dirs = TestDirs::new();

    let resp = send(
        &test,
        &dirs,
        Request::get("/api/admin/stats").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect the OpenAPI document to be served
#[tokio::test]
async fn serves_openapi_document() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let dirs = TestDirs::new();

    let resp = send(
        &test,
        &dirs,
        Request::get("/api/docs/openapi.json")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await)?;
    assert!(body["paths"]["/webhook"].is_object());

    Ok(())
}
