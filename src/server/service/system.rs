//! Health checks and diagnostics shared by `/api/system/status` and the `diagnose` binary.

use std::path::Path;

use sea_orm::DatabaseConnection;

use crate::{
    model::system::{DiagnosticCheckDto, RecordCountsDto, SystemStatusDto},
    server::{
        config::REQUIRED_ENV_VARS,
        data::{
            checkin::CheckinRepository, event::EventRepository, member::MemberRepository,
            registration::RegistrationRepository,
        },
        error::Error,
        line::LineClient,
        model::app::AppState,
        util::time::elapsed_seconds,
    },
};

const CHECK_FILE: &str = ".lionsclub-write-check";

fn check(name: &str, ok: bool, detail: impl Into<String>) -> DiagnosticCheckDto {
    DiagnosticCheckDto {
        name: name.to_string(),
        ok,
        detail: detail.into(),
    }
}

/// Reports required environment variables that are missing or empty
///
/// # Arguments
/// - `lookup` - Resolves a variable name to its value, `std::env::var` outside of tests
pub fn check_env_vars<F>(lookup: F) -> DiagnosticCheckDto
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<&str> = REQUIRED_ENV_VARS
        .iter()
        .copied()
        .filter(|name| lookup(name).map_or(true, |value| value.trim().is_empty()))
        .collect();

    if missing.is_empty() {
        check("environment", true, "All required variables are set")
    } else {
        check(
            "environment",
            false,
            format!("Missing variables: {}", missing.join(", ")),
        )
    }
}

pub async fn check_database(db: &DatabaseConnection) -> DiagnosticCheckDto {
    match db.ping().await {
        Ok(()) => check("database", true, "Database reachable"),
        Err(e) => check("database", false, format!("Database unreachable: {}", e)),
    }
}

/// Checks that the frontend build is present
pub async fn check_static_dir(static_dir: &Path) -> DiagnosticCheckDto {
    let index = static_dir.join("index.html");

    match tokio::fs::metadata(&index).await {
        Ok(metadata) if metadata.is_file() => {
            check("static", true, format!("{} present", index.display()))
        }
        _ => check("static", false, format!("{} not found", index.display())),
    }
}

/// Checks that uploads can be written by creating and removing a check file
pub async fn check_upload_dir(upload_dir: &Path) -> DiagnosticCheckDto {
    let check_file = upload_dir.join(CHECK_FILE);

    let result = async {
        tokio::fs::create_dir_all(upload_dir).await?;
        tokio::fs::write(&check_file, b"ok").await?;
        tokio::fs::remove_file(&check_file).await
    }
    .await;

    match result {
        Ok(()) => check(
            "uploads",
            true,
            format!("{} writable", upload_dir.display()),
        ),
        Err(e) => check(
            "uploads",
            false,
            format!("{} not writable: {}", upload_dir.display(), e),
        ),
    }
}

/// Checks that the channel access token is accepted by LINE
pub async fn check_line_token(line: &LineClient) -> DiagnosticCheckDto {
    match line.get_bot_info().await {
        Ok(bot) => check(
            "line",
            true,
            format!("Token accepted for {} ({})", bot.display_name, bot.basic_id),
        ),
        Err(e) => check("line", false, format!("Token rejected: {}", e)),
    }
}

pub async fn record_counts(db: &DatabaseConnection) -> Result<RecordCountsDto, Error> {
    Ok(RecordCountsDto {
        members: MemberRepository::new(db).count_all().await?,
        events: EventRepository::new(db).count_all().await?,
        registrations: RegistrationRepository::new(db).count_all().await?,
        checkins: CheckinRepository::new(db).count_all().await?,
    })
}

pub struct SystemService<'a> {
    state: &'a AppState,
}

impl<'a> SystemService<'a> {
    /// Creates a new instance of [`SystemService`]
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Whether the database answers a ping
    pub async fn database_ok(&self) -> bool {
        match self.state.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Database ping failed: {}", e);
                false
            }
        }
    }

    /// Runtime status without calling the LINE API
    pub async fn status(&self) -> SystemStatusDto {
        let config = &self.state.config;
        let database = check_database(&self.state.db).await;

        let counts = if database.ok {
            match record_counts(&self.state.db).await {
                Ok(counts) => Some(counts),
                Err(e) => {
                    tracing::warn!("Failed to count records: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let line_configured = !config.line_channel_access_token.is_empty()
            && !config.line_channel_secret.is_empty();

        SystemStatusDto {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: elapsed_seconds(self.state.started_at, std::time::Instant::now()),
            checks: vec![
                database,
                check(
                    "line",
                    line_configured,
                    if line_configured {
                        "LINE channel configured"
                    } else {
                        "LINE channel not configured"
                    },
                ),
                check_static_dir(&config.static_dir).await,
                check_upload_dir(&config.upload_dir).await,
            ],
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use lionsclub_test_utils::prelude::*;

    use crate::server::{
        line::LineClient,
        service::system::{
            check_env_vars, check_line_token, check_static_dir, check_upload_dir, SystemService,
        },
        util::test::test_app_state,
    };

    /// Expect missing and blank variables to be listed
    #[test]
    fn reports_missing_env_vars() {
        let result = check_env_vars(|name| match name {
            "DATABASE_URL" => Some("postgres://localhost/lions".to_string()),
            "ADMIN_PASSWORD" => Some(" ".to_string()),
            _ => None,
        });

        assert!(!result.ok);
        assert_eq!(
            result.detail,
            "Missing variables: LINE_CHANNEL_ACCESS_TOKEN, LINE_CHANNEL_SECRET, ADMIN_PASSWORD"
        );
    }

    /// Expect success when every variable is set
    #[test]
    fn accepts_complete_env() {
        let result = check_env_vars(|_| Some("set".to_string()));

        assert!(result.ok);
    }

    /// Expect the static check to require index.html
    #[tokio::test]
    async fn static_dir_requires_index() {
        let dir = tempfile::tempdir().unwrap();

        let missing = check_static_dir(dir.path()).await;
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        let present = check_static_dir(dir.path()).await;

        assert!(!missing.ok);
        assert!(present.ok);
    }

    /// Expect a nested upload directory to be created and left without the check file
    #[tokio::test]
    async fn upload_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("nested/uploads");

        let result = check_upload_dir(&uploads).await;

        assert!(result.ok);
        assert_eq!(std::fs::read_dir(&uploads).unwrap().count(), 0);
    }

    /// Expect the token check to follow the bot info status
    #[tokio::test]
    async fn line_token_check_uses_bot_info() -> Result<(), TestError> {
        let mut test = TestBuilder::new().build().await?;
        let accepted = test.line().create_bot_info_endpoint(200, 1);
        let line = LineClient::new(
            &test.line_api_url(),
            TEST_CHANNEL_ACCESS_TOKEN,
            TEST_CHANNEL_SECRET,
        )
        .unwrap();

        let result = check_line_token(&line).await;

        accepted.assert();
        assert!(result.ok);
        assert!(result.detail.contains("Lions Club Bot"));

        Ok(())
    }

    /// Expect a rejected token to fail the check
    #[tokio::test]
    async fn line_token_check_reports_rejection() -> Result<(), TestError> {
        let mut test = TestBuilder::new().build().await?;
        let rejected = test.line().create_bot_info_endpoint(401, 1);
        let line = LineClient::new(&test.line_api_url(), "expired", TEST_CHANNEL_SECRET).unwrap();

        let result = check_line_token(&line).await;

        rejected.assert();
        assert!(!result.ok);

        Ok(())
    }

    /// Expect status to report database, counts and a missing frontend
    #[tokio::test]
    async fn status_reports_checks_and_counts() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_core_tables().build().await?;
        test.member().insert_member("Alice", None).await?;
        let static_dir = tempfile::tempdir().unwrap();
        let upload_dir = tempfile::tempdir().unwrap();
        let state = test_app_state(&test, static_dir.path(), upload_dir.path());

        let status = SystemService::new(&state).status().await;

        let check = |name: &str| status.checks.iter().find(|c| c.name == name).unwrap().ok;
        assert!(check("database"));
        assert!(check("line"));
        assert!(!check("static"));
        assert!(check("uploads"));
        assert_eq!(status.counts.map(|c| c.members), Some(1));

        Ok(())
    }
}
