//! Construction of the application's long-lived resources.

use std::{sync::Arc, time::Instant};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::server::{
    config::Config,
    error::{config::ConfigError, Error},
    line::LineClient,
    model::app::AppState,
    router,
};

/// Multipart framing on top of the largest accepted upload
const BODY_LIMIT_OVERHEAD: u64 = 64 * 1024;

/// Build the LINE Messaging API client from the channel credentials
pub fn build_line_client(config: &Config) -> Result<LineClient, Error> {
    let line = LineClient::new(
        &config.line_api_url,
        &config.line_channel_access_token,
        &config.line_channel_secret,
    )?;

    Ok(line)
}

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let pool = &config.db_pool;

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .connect_timeout(pool.connect_timeout)
        .idle_timeout(pool.idle_timeout)
        .acquire_timeout(pool.acquire_timeout)
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    tracing::info!("Database connected and migrations applied");

    Ok(db)
}

/// Configure admin session management on an in-memory store
pub fn session_layer() -> SessionManagerLayer<MemoryStore> {
    use time::Duration;
    use tower_sessions::{cookie::SameSite, Expiry};

    // Secure cookies outside of debug builds
    let secure_cookies = !cfg!(debug_assertions);

    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
}

/// CORS for the configured frontend origin, any origin when unset
pub fn cors_layer(config: &Config) -> Result<CorsLayer, Error> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    let cors = match &config.cors_allowed_origin {
        Some(origin) => {
            let origin =
                HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidEnvValue {
                    var: "CORS_ALLOWED_ORIGIN".to_string(),
                    reason: e.to_string(),
                })?;

            cors.allow_origin(origin).allow_credentials(true)
        }
        None => cors.allow_origin(Any),
    };

    Ok(cors)
}

/// Assemble state, routes and middleware into the served application
pub fn build_app(
    config: Config,
    db: DatabaseConnection,
    line: LineClient,
) -> Result<Router, Error> {
    let cors = cors_layer(&config)?;
    let body_limit = config.max_upload_bytes.saturating_add(BODY_LIMIT_OVERHEAD);
    let static_dir = config.static_dir.clone();

    let state = AppState {
        db,
        line,
        config: Arc::new(config),
        started_at: Instant::now(),
    };

    let app = router::routes(&static_dir)
        .with_state(state)
        .layer(DefaultBodyLimit::max(
            usize::try_from(body_limit).unwrap_or(usize::MAX),
        ))
        .layer(session_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
