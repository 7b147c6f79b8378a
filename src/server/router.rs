//! HTTP routing and OpenAPI documentation configuration.
//!
//! This module defines the application's HTTP routes and generates the OpenAPI document
//! using utoipa. API endpoints are registered with their OpenAPI specifications, Swagger UI
//! is served at `/api/docs`, unknown `/api/...` paths answer with a JSON 404 and every other
//! path is served from the static frontend directory with an `index.html` fallback.

use std::path::Path;

use axum::{http::StatusCode, response::Response, routing::any, Router};
use tower_http::services::{ServeDir, ServeFile};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, error::json_error, model::app::AppState};

async fn api_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

/// Builds the application's HTTP router.
///
/// # Registered Endpoints
/// - `/api/auth/*` - admin login, logout and session state
/// - `/api/members`, `/api/events`, `/api/registrations`, `/api/checkins`, `/api/payments`
/// - `/api/announcements`, `/api/push/*`, `/api/files`
/// - `/api/admin/*` - dashboard statistics, event reports and CSV exports
/// - `/api/liff/*` - LIFF mini app configuration, self registration and profile
/// - `/api/system/status`, `/health`, `/healthz`
/// - `POST /webhook` - LINE Messaging API webhook
///
/// The OpenAPI specification is available at `/api/docs/openapi.json`.
///
/// # Arguments
/// - `static_dir` - Directory holding the built frontend, `index.html` answers unknown paths
///
/// # Returns
/// An Axum `Router<AppState>` with every route registered, ready for state and layers.
pub fn routes(static_dir: &Path) -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Lions Club", description = "Lions Club membership and check-in API"),
        tags(
            (name = controller::auth::AUTH_TAG, description = "Admin authentication"),
            (name = controller::member::MEMBER_TAG, description = "Club members"),
            (name = controller::event::EVENT_TAG, description = "Events"),
            (name = controller::registration::REGISTRATION_TAG, description = "Event registrations"),
            (name = controller::checkin::CHECKIN_TAG, description = "Event check-ins"),
            (name = controller::payment::PAYMENT_TAG, description = "Dues and event fees"),
            (name = controller::announcement::ANNOUNCEMENT_TAG, description = "Announcements"),
            (name = controller::push::PUSH_TAG, description = "LINE push messages"),
            (name = controller::file::FILE_TAG, description = "File uploads"),
            (name = controller::admin::ADMIN_TAG, description = "Reports and exports"),
            (name = controller::liff::LIFF_TAG, description = "LIFF mini app"),
            (name = controller::system::SYSTEM_TAG, description = "Health and diagnostics"),
            (name = controller::webhook::WEBHOOK_TAG, description = "LINE webhook"),
        )
    )]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::auth::get_session))
        .routes(routes!(
            controller::member::list_members,
            controller::member::create_member
        ))
        .routes(routes!(
            controller::member::get_member,
            controller::member::update_member,
            controller::member::delete_member
        ))
        .routes(routes!(controller::member::get_member_by_line_user_id))
        .routes(routes!(
            controller::event::list_events,
            controller::event::create_event
        ))
        .routes(routes!(
            controller::event::get_event,
            controller::event::update_event,
            controller::event::delete_event
        ))
        .routes(routes!(controller::event::get_event_registrations))
        .routes(routes!(controller::event::get_event_checkins))
        .routes(routes!(
            controller::registration::list_registrations,
            controller::registration::create_registration
        ))
        .routes(routes!(
            controller::registration::update_registration,
            controller::registration::delete_registration
        ))
        .routes(routes!(
            controller::checkin::list_checkins,
            controller::checkin::create_checkin
        ))
        .routes(routes!(controller::checkin::delete_checkin))
        .routes(routes!(
            controller::payment::list_payments,
            controller::payment::create_payment
        ))
        .routes(routes!(
            controller::payment::get_payment,
            controller::payment::update_payment
        ))
        .routes(routes!(
            controller::announcement::list_announcements,
            controller::announcement::create_announcement
        ))
        .routes(routes!(
            controller::announcement::get_announcement,
            controller::announcement::update_announcement,
            controller::announcement::delete_announcement
        ))
        .routes(routes!(controller::announcement::publish_announcement))
        .routes(routes!(controller::push::send_push))
        .routes(routes!(controller::push::list_push_records))
        .routes(routes!(controller::push::get_push_record))
        .routes(routes!(controller::push::list_messages))
        .routes(routes!(
            controller::push::list_templates,
            controller::push::create_template
        ))
        .routes(routes!(
            controller::push::get_template,
            controller::push::update_template,
            controller::push::delete_template
        ))
        .routes(routes!(
            controller::file::list_files,
            controller::file::upload_file
        ))
        .routes(routes!(
            controller::file::get_file,
            controller::file::delete_file
        ))
        .routes(routes!(controller::file::download_file))
        .routes(routes!(controller::admin::get_stats))
        .routes(routes!(controller::admin::get_event_report))
        .routes(routes!(controller::admin::export_members))
        .routes(routes!(controller::admin::export_event_checkins))
        .routes(routes!(controller::liff::get_config))
        .routes(routes!(controller::liff::register))
        .routes(routes!(controller::liff::get_profile))
        .routes(routes!(controller::system::health))
        .routes(routes!(controller::system::healthz))
        .routes(routes!(controller::system::get_status))
        .routes(routes!(controller::webhook::webhook))
        .split_for_parts();

    let frontend = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    routes
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .route("/api", any(api_not_found))
        .route("/api/{*path}", any(api_not_found))
        .fallback_service(frontend)
}
