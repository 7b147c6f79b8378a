use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::PaymentStatus;
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::ErrorDto,
        payment::{CreatePaymentDto, PaymentDto, UpdatePaymentDto},
    },
    server::{
        controller::util::admin::require_admin, error::Error, model::app::AppState,
        service::payment::PaymentService,
    },
};

pub static PAYMENT_TAG: &str = "payment";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PaymentQuery {
    pub member_id: Option<i32>,
    pub event_id: Option<i32>,
    #[param(value_type = Option<String>)]
    pub status: Option<PaymentStatus>,
}

#[utoipa::path(
    get,
    path = "/api/payments",
    tag = PAYMENT_TAG,
    params(PaymentQuery),
    responses(
        (status = 200, description = "Payments, newest first", body = Vec<PaymentDto>),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_payments(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PaymentQuery>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let payments = PaymentService::new(&state.db)
        .list(query.member_id, query.event_id, query.status)
        .await?;

    Ok((StatusCode::OK, Json(payments)))
}

#[utoipa::path(
    post,
    path = "/api/payments",
    tag = PAYMENT_TAG,
    request_body = CreatePaymentDto,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentDto),
        (status = 400, description = "Invalid amount", body = ErrorDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Member or event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_payment(
    State(state): State<AppState>,
    session: Session,
    Json(payment): Json<CreatePaymentDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let payment = PaymentService::new(&state.db).create(payment).await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = PAYMENT_TAG,
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment", body = PaymentDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Payment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_payment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let payment = PaymentService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(payment)))
}

/// Updates a payment, marking it paid stamps `paid_at`
#[utoipa::path(
    put,
    path = "/api/payments/{id}",
    tag = PAYMENT_TAG,
    params(("id" = i32, Path, description = "Payment ID")),
    request_body = UpdatePaymentDto,
    responses(
        (status = 200, description = "Updated payment", body = PaymentDto),
        (status = 400, description = "Invalid amount", body = ErrorDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Payment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_payment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(changes): Json<UpdatePaymentDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let payment = PaymentService::new(&state.db).update(id, changes).await?;

    Ok((StatusCode::OK, Json(payment)))
}
