use std::{
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};

use lionsclub_test_utils::prelude::*;

use crate::server::{
    config::{Config, DbPoolConfig},
    line::LineClient,
    model::app::AppState,
};

/// Configuration pointing at the test context's mock LINE API and the given directories
pub fn test_config(test: &TestContext, static_dir: &Path, upload_dir: &Path) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        line_channel_access_token: TEST_CHANNEL_ACCESS_TOKEN.to_string(),
        line_channel_secret: TEST_CHANNEL_SECRET.to_string(),
        admin_password: TEST_ADMIN_PASSWORD.to_string(),
        line_api_url: test.line_api_url(),
        liff_id: Some(TEST_LIFF_ID.to_string()),
        bind_address: "127.0.0.1:0".to_string(),
        static_dir: static_dir.to_path_buf(),
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 1024,
        cors_allowed_origin: None,
        db_pool: DbPoolConfig {
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            acquire_timeout: Duration::from_secs(5),
        },
    }
}

/// [`AppState`] sharing the test context's database
pub fn test_app_state(test: &TestContext, static_dir: &Path, upload_dir: &Path) -> AppState {
    let config = test_config(test, static_dir, upload_dir);
    let line = LineClient::new(
        &config.line_api_url,
        &config.line_channel_access_token,
        &config.line_channel_secret,
    )
    .unwrap();

    AppState {
        db: test.db.clone(),
        line,
        config: Arc::new(config),
        started_at: Instant::now(),
    }
}
