use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    model::api::ErrorDto,
    server::{
        error::{line::LineError, Error},
        line::model::WebhookRequest,
        model::app::AppState,
        service::webhook::WebhookService,
    },
};

pub static WEBHOOK_TAG: &str = "webhook";

pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// LINE Messaging API webhook
///
/// The raw body is verified against the `x-line-signature` header before it is parsed.
/// Once verified the request is always acknowledged, failures of individual events are
/// only logged.
///
/// # Responses
/// - 200 (OK): Events accepted
/// - 400 (Bad Request): Missing signature header or malformed payload
/// - 401 (Unauthorized): Signature does not match the channel secret
#[utoipa::path(
    post,
    path = "/webhook",
    tag = WEBHOOK_TAG,
    request_body(content = String, description = "LINE webhook payload", content_type = "application/json"),
    responses(
        (status = 200, description = "Events accepted"),
        (status = 400, description = "Missing signature or malformed payload", body = ErrorDto),
        (status = 401, description = "Invalid signature", body = ErrorDto)
    ),
)]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    state.line.verify_signature(&body, signature)?;

    let request: WebhookRequest = serde_json::from_slice(&body).map_err(LineError::from)?;

    WebhookService::new(&state.db, &state.line, state.config.liff_id.as_deref())
        .handle(request)
        .await;

    Ok((StatusCode::OK, Json(json!({}))))
}
