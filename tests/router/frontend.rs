use axum::http::StatusCode;

use super::*;
use crate::util::TEST_INDEX_HTML;

/// Expect unknown paths outside `/api` to fall back to the SPA entry point
#[tokio::test]
async fn unknown_page_serves_index_html() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let dirs = TestDirs::new();

    let resp = send(
        &test,
        &dirs,
        Request::get("/members/42").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, TEST_INDEX_HTML);

    Ok(())
}

/// Expect unknown API paths to get a JSON 404 instead of the SPA
#[tokio::test]
async fn unknown_api_path_is_json_not_found() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let dirs = TestDirs::new();

    let resp = send(
        &test,
        &dirs,
        Request::get("/api/does-not-exist")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await)?;
    assert!(body["error"].is_string());

    Ok(())
}
