//! Environment configuration.

use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::server::error::config::ConfigError;

/// Default LINE Messaging API base URL
pub const DEFAULT_LINE_API_URL: &str = "https://api.line.me";

/// Environment variables which must be set for the server to start
pub const REQUIRED_ENV_VARS: [&str; 4] = [
    "DATABASE_URL",
    "LINE_CHANNEL_ACCESS_TOKEN",
    "LINE_CHANNEL_SECRET",
    "ADMIN_PASSWORD",
];

/// Server configuration read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub line_channel_access_token: String,
    pub line_channel_secret: String,
    pub admin_password: String,
    pub line_api_url: String,
    pub liff_id: Option<String>,
    pub bind_address: String,
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub cors_allowed_origin: Option<String>,
    pub db_pool: DbPoolConfig,
}

/// Connection pool settings for sea-orm.
#[derive(Clone, Debug)]
pub struct DbPoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl Config {
    /// Reads configuration from environment variables.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and every value parsed
    /// - `Err(ConfigError::MissingEnvVar)` - A required variable is unset or empty
    /// - `Err(ConfigError::InvalidEnvValue)` - A numeric variable failed to parse or the
    ///   pool bounds are inconsistent
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            database_url: required("DATABASE_URL")?,
            line_channel_access_token: required("LINE_CHANNEL_ACCESS_TOKEN")?,
            line_channel_secret: required("LINE_CHANNEL_SECRET")?,
            admin_password: required("ADMIN_PASSWORD")?,
            line_api_url: optional("LINE_API_URL")
                .unwrap_or_else(|| DEFAULT_LINE_API_URL.to_string()),
            liff_id: optional("LIFF_ID"),
            bind_address: optional("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            static_dir: PathBuf::from(optional("STATIC_DIR").unwrap_or_else(|| "public".into())),
            upload_dir: PathBuf::from(optional("UPLOAD_DIR").unwrap_or_else(|| "uploads".into())),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            cors_allowed_origin: optional("CORS_ALLOWED_ORIGIN"),
            db_pool: DbPoolConfig {
                max_connections: parsed("DB_MAX_CONNECTIONS", 10)?,
                min_connections: parsed("DB_MIN_CONNECTIONS", 1)?,
                connect_timeout: Duration::from_secs(parsed("DB_CONNECT_TIMEOUT_SECS", 30)?),
                idle_timeout: Duration::from_secs(parsed("DB_IDLE_TIMEOUT_SECS", 600)?),
                acquire_timeout: Duration::from_secs(parsed("DB_ACQUIRE_TIMEOUT_SECS", 30)?),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Rejects combinations of values which parse on their own but can't work together
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidEnvValue {
                var: "MAX_UPLOAD_BYTES".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.db_pool.min_connections > self.db_pool.max_connections {
            return Err(ConfigError::InvalidEnvValue {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "{} exceeds DB_MAX_CONNECTIONS ({})",
                    self.db_pool.min_connections, self.db_pool.max_connections
                ),
            });
        }

        Ok(())
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

fn optional(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(var) {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: format!("{:?} ({})", value, e),
        }),
    }
}
