use chrono::{DateTime, NaiveDate};

use crate::domain::arrival::{format_scheduled_time, parse_scheduled_time};
use crate::error::ApiError;

/// Checks a 24-hour "H:MM"/"HH:MM" time and returns it zero-padded as "HH:MM".
pub fn validate_time(value: &str) -> Result<String, ApiError> {
    parse_scheduled_time(value)
        .map(format_scheduled_time)
        .ok_or(ApiError::InvalidTimeFormat)
}

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp (its date part is kept).
pub fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| ApiError::InvalidDate)
}

/// Trimmed text, or `None` when missing or blank.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
