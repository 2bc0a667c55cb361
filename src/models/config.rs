//! Configuration model loaded from external sources.

use std::ops::RangeInclusive;

use serde::Deserialize;
use thiserror::Error;

/// Access tokens live at most one day.
pub const ACCESS_TOKEN_TTL_MINUTES: RangeInclusive<i64> = 1..=24 * 60;
/// Refresh tokens live at most one year.
pub const REFRESH_TOKEN_TTL_DAYS: RangeInclusive<i64> = 1..=365;
pub const MAX_UPLOAD_MB: RangeInclusive<i64> = 1..=1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
}

fn check_range(
    field: &'static str,
    range: &RangeInclusive<i64>,
    value: i64,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            min: *range.start(),
            max: *range.end(),
            value,
        })
    }
}

fn default_access_token_ttl_minutes() -> i64 {
    15
}

fn default_refresh_token_ttl_days() -> i64 {
    7
}

fn default_max_upload_mb() -> usize {
    5
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers. Loaded from `config/*.yaml` and `APP_*` variables.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Key used to sign access tokens.
    pub secret: String,
    #[serde(default = "default_access_token_ttl_minutes")]
    pub access_token_ttl_minutes: i64,
    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: i64,
    pub upload_dir: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
    /// Allowed browser origin. Any origin is accepted when unset.
    #[serde(default)]
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Rejects token lifetimes and upload limits outside their supported ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "access_token_ttl_minutes",
            &ACCESS_TOKEN_TTL_MINUTES,
            self.access_token_ttl_minutes,
        )?;
        check_range(
            "refresh_token_ttl_days",
            &REFRESH_TOKEN_TTL_DAYS,
            self.refresh_token_ttl_days,
        )?;
        let upload_mb = i64::try_from(self.max_upload_mb).unwrap_or(i64::MAX);
        check_range("max_upload_mb", &MAX_UPLOAD_MB, upload_mb)
    }
}
