//! Input validators and query-parameter parsers.
//!
//! Handlers run these before any filter is built, so the filter builder and
//! the repositories only ever see well-formed values.

use chrono::{DateTime, NaiveDate, Utc};
use validator::{ValidateEmail, ValidateUrl};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Number of digits in a German postal code (PLZ).
pub const PLZ_LEN: usize = 5;

/// Require exactly five ASCII digits. Leading zeros are allowed.
pub fn validate_plz(plz: &str) -> Result<(), CoreError> {
    if plz.len() == PLZ_LEN && plz.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "plz must be exactly {PLZ_LEN} digits, got '{plz}'"
        )))
    }
}

/// Require a character count within `[min, max]`.
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(CoreError::Validation(format!(
            "{field} must be between {min} and {max} characters, got {len}"
        )));
    }
    Ok(())
}

/// Require an integer within `[min, max]`.
pub fn validate_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), CoreError> {
    if value < min || value > max {
        return Err(CoreError::Validation(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid email address '{email}'")))
    }
}

pub fn validate_url(field: &str, url: &str) -> Result<(), CoreError> {
    if url.validate_url() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("{field} contains an invalid URL '{url}'")))
    }
}

/// Lower-case and trim an email address before storing or looking it up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Parse an ISO-8601 date-time (RFC 3339) or a plain `YYYY-MM-DD` date,
/// which is taken as midnight UTC.
pub fn parse_datetime_param(field: &str, value: &str) -> Result<Timestamp, CoreError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "{field} must be an ISO-8601 date or date-time, got '{value}'"
            ))
        })
}

pub fn parse_uuid_param(field: &str, value: &str) -> Result<DbId, CoreError> {
    DbId::parse_str(value.trim())
        .map_err(|_| CoreError::Validation(format!("{field} must be a UUID, got '{value}'")))
}

/// Lenient boolean: `true`/`false` in any case; anything else means "unset".
pub fn parse_bool_param(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse an optional parameter, treating empty strings as absent.
pub fn parse_optional<T>(
    value: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, CoreError>,
) -> Result<Option<T>, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => parse(v).map(Some),
        _ => Ok(None),
    }
}
