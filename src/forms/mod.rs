//! Request payloads accepted by the API routes.
//!
//! Each `*Form` is deserialized straight from JSON or the query string and
//! checked with `validator`; the matching `*Payload` holds the parsed domain
//! values the services work with.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;
use crate::repository::Pagination;

pub mod admin;
pub mod applications;
pub mod auth;
pub mod candidates;
pub mod custom_forms;
pub mod interviews;
pub mod jobs;
pub mod notes;

#[derive(Debug, Error)]
/// Errors that can occur when processing request data.
pub enum FormError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Constraint(#[from] TypeConstraintError),

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid date-time `{0}`")]
    InvalidDateTime(String),

    #[error("{0} is required")]
    Missing(&'static str),
}

/// `page` and `limit` query parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl PageQuery {
    pub fn pagination(&self, default_limit: usize) -> Pagination {
        page_of(self.page, self.limit, default_limit)
    }
}

/// Builds a normalized page from optional `page`/`limit` parameters.
pub fn page_of(page: Option<usize>, limit: Option<usize>, default_limit: usize) -> Pagination {
    Pagination::new(page.unwrap_or(1), limit.unwrap_or(default_limit))
}

/// Page size used when a list endpoint does not say otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Parses an optional enum value, treating blank input as absent.
pub fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, FormError>
where
    T: FromStr<Err = TypeConstraintError>,
{
    match non_blank(value) {
        Some(raw) => Ok(Some(raw.parse()?)),
        None => Ok(None),
    }
}

/// Trims `value` and drops it when nothing is left.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn non_blank_owned(value: Option<String>) -> Option<String> {
    non_blank(value.as_deref()).map(str::to_string)
}

pub fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate(value.to_string()))
}

/// Accepts RFC 3339 (converted to UTC) or a naive `YYYY-MM-DDTHH:MM[:SS]` taken as UTC.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, FormError> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| FormError::InvalidDateTime(value.to_string()))
}
