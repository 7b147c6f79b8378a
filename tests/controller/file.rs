//! Tests for the file upload endpoint.

use axum::{
    body::Body,
    extract::{FromRequest, Multipart, State},
    http::{header, Request, StatusCode},
    response::IntoResponse,
};
use lionsclub::server::{controller::file::upload_file, model::session::admin::SessionAdmin};

use super::*;

const BOUNDARY: &str = "lionsclub-boundary";

/// Extracts a `Multipart` from a form-data body made of `(name, filename, content)` parts
async fn multipart(parts: &[(&str, Option<&str>, &str)]) -> Multipart {
    let mut body = String::new();
    for (name, filename, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/plain\r\n\r\n",
                name, filename
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    let request = Request::post("/api/files")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    Multipart::from_request(request, &()).await.unwrap()
}

/// Expect 400 when the form has no `file` field
#[tokio::test]
async fn upload_without_file_field_is_bad_request() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let dirs = TestDirs::new();
    SessionAdmin::insert(&test.session).await.unwrap();

    let result = upload_file(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        multipart(&[("event_id", None, "1")]).await,
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect 201 and the bytes on disk for a well-formed upload
#[tokio::test]
async fn upload_stores_file() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let dirs = TestDirs::new();
    SessionAdmin::insert(&test.session).await.unwrap();

    let resp = upload_file(
        State(test.into_app_state(&dirs)),
        test.session.clone(),
        multipart(&[("file", Some("minutes.txt"), "Board meeting minutes")]).await,
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let stored = std::fs::read_dir(dirs.upload_dir.path()).unwrap().count();
    assert_eq!(stored, 1);

    Ok(())
}
