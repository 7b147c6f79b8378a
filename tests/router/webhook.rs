use axum::http::StatusCode;
use lionsclub::server::controller::webhook::SIGNATURE_HEADER;
use serde_json::json;

use super::*;

fn help_message_body() -> Vec<u8> {
    json!({
        "destination": "Ubot",
        "events": [{
            "type": "message",
            "replyToken": "reply-token",
            "source": { "type": "user", "userId": "U1" },
            "message": { "id": "1", "type": "text", "text": "help" }
        }]
    })
    .to_string()
    .into_bytes()
}

fn webhook_request(body: Vec<u8>, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/webhook").header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }

    builder.body(Body::from(body)).unwrap()
}

/// Expect a correctly signed message to be acknowledged and answered
#[tokio::test]
async fn signed_message_is_answered() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_all_tables()
        .with_reply_endpoint(1)
        .build()
        .await?;
    let dirs = TestDirs::new();
    let body = help_message_body();
    let signature = sign_body(&body);

    let resp = send(&test, &dirs, webhook_request(body, Some(&signature))).await;

    assert_eq!(resp.status(), StatusCode::OK);
    test.assert_mocks();

    Ok(())
}

/// Expect 401 when the signature was made with another secret
#[tokio::test]
async fn wrong_signature_is_unauthorized() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_all_tables()
        .with_reply_endpoint(0)
        .build()
        .await?;
    let dirs = TestDirs::new();
    let signature = sign_body(b"a different body");

    let resp = send(
        &test,
        &dirs,
        webhook_request(help_message_body(), Some(&signature)),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    test.assert_mocks();

    Ok(())
}

/// Expect 400 when the signature header is missing
#[tokio::test]
async fn missing_signature_is_bad_request() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let dirs = TestDirs::new();

    let resp = send(&test, &dirs, webhook_request(help_message_body(), None)).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect 400 for a correctly signed body that is not a webhook payload
#[tokio::test]
async fn signed_garbage_is_bad_request() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let dirs = TestDirs::new();
    let body = b"not json".to_vec();
    let signature = sign_body(&body);

    let resp = send(&test, &dirs, webhook_request(body, Some(&signature))).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
