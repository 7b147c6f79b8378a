//! Test utilities for building AppState and the full router on top of a TestContext

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::Router;
use lionsclub::server::{
    config::{Config, DbPoolConfig},
    line::LineClient,
    model::app::AppState,
    startup,
};
use lionsclub_test_utils::prelude::*;
use tempfile::TempDir;

pub static TEST_INDEX_HTML: &str = "<!doctype html><title>Lions Club</title>";

/// Temporary static and upload directories, removed when dropped.
///
/// The static directory contains an `index.html` so the SPA fallback has something to serve.
pub struct TestDirs {
    pub static_dir: TempDir,
    pub upload_dir: TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        let static_dir = TempDir::new().expect("Failed to create static dir");
        let upload_dir = TempDir::new().expect("Failed to create upload dir");

        std::fs::write(static_dir.path().join("index.html"), TEST_INDEX_HTML)
            .expect("Failed to write index.html");

        Self {
            static_dir,
            upload_dir,
        }
    }
}

/// Extension trait for TestContext to create configuration, AppState and the router
pub trait TestContextExt {
    fn test_config(&self, dirs: &TestDirs) -> Config;
    fn into_app_state(&self, dirs: &TestDirs) -> AppState;
    fn into_app(&self, dirs: &TestDirs) -> Router;
}

impl TestContextExt for TestContext {
    fn test_config(&self, dirs: &TestDirs) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            line_channel_access_token: TEST_CHANNEL_ACCESS_TOKEN.to_string(),
            line_channel_secret: TEST_CHANNEL_SECRET.to_string(),
            admin_password: TEST_ADMIN_PASSWORD.to_string(),
            line_api_url: self.line_api_url(),
            liff_id: Some(TEST_LIFF_ID.to_string()),
            bind_address: "127.0.0.1:0".to_string(),
            static_dir: dirs.static_dir.path().to_path_buf(),
            upload_dir: dirs.upload_dir.path().to_path_buf(),
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

    fn into_app_state(&self, dirs: &TestDirs) -> AppState {
        let config = self.test_config(dirs);
        let line = startup::build_line_client(&config).expect("Failed to build LINE client");

        AppState {
            db: self.db.clone(),
            line,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    fn into_app(&self, dirs: &TestDirs) -> Router {
        let config = self.test_config(dirs);
        let line: LineClient =
            startup::build_line_client(&config).expect("Failed to build LINE client");

        startup::build_app(config, self.db.clone(), line).expect("Failed to build app")
    }
}
