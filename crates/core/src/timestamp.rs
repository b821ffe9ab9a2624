//! Dispatch timestamp parsing and normalization.
//!
//! Dispatch times arrive as ISO-8601 strings and are stored in UTC, truncated
//! to whole seconds, as `YYYY-MM-DD HH:MM:SS`. Duplicate detection compares
//! the normalized form, so inputs that differ only in zone notation or
//! sub-second precision describe the same dispatch.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use thiserror::Error;

/// Storage format for dispatch times.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid timestamp '{0}': expected an ISO-8601 date or datetime")]
pub struct TimestampError(pub String);

/// Parse an ISO-8601 date or datetime into a UTC instant truncated to seconds.
///
/// Values without an offset are taken as UTC; a bare date means midnight.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc).trunc_subsecs(0));
    }

    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    // "Z" without seconds, e.g. 2024-09-10T10:00Z
    let naive_part = trimmed
        .strip_suffix('Z')
        .or_else(|| trimmed.strip_suffix('z'))
        .unwrap_or(trimmed);

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_part, format) {
            return Ok(naive.and_utc().trunc_subsecs(0));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(TimestampError(input.to_string()))
}

/// Render an instant in the normalized storage form.
pub fn normalize(time: &DateTime<Utc>) -> String {
    time.trunc_subsecs(0).format(STORAGE_FORMAT).to_string()
}

/// Read back a stored dispatch time.
pub(crate) fn from_storage(value: &str) -> Result<DateTime<Utc>, TimestampError> {
    NaiveDateTime::parse_from_str(value, STORAGE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError(value.to_string()))
}
