//! Shared query parameter parsing for listing handlers.
//!
//! Query strings are deserialized as raw strings and parsed here so every
//! malformed value produces the same JSON validation error.

use nachbar_core::error::CoreError;
use nachbar_core::types::DbId;
use nachbar_core::validation::{parse_optional, parse_uuid_param};

/// Parse the optional `take` parameter. Range clamping happens in the
/// pagination engine; only non-integers are rejected here. Integers beyond
/// the `i64` range saturate so they clamp like any other oversized value.
pub fn parse_take(take: Option<&str>) -> Result<Option<i64>, CoreError> {
    parse_optional(take, |v| {
        parse_saturating(v).ok_or_else(|| CoreError::Validation("take must be an integer".into()))
    })
}

fn parse_saturating(value: &str) -> Option<i64> {
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Parse the optional `cursor` parameter. It must be an id.
pub fn parse_cursor(cursor: Option<&str>) -> Result<Option<DbId>, CoreError> {
    parse_optional(cursor, |v| parse_uuid_param("cursor", v))
}

/// Parse an optional integer parameter.
pub fn parse_int(field: &'static str, value: Option<&str>) -> Result<Option<i64>, CoreError> {
    parse_optional(value, |v| {
        v.parse::<i64>()
            .map_err(|_| CoreError::Validation(format!("{field} must be an integer")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use nachbar_core::pagination::{clamp_take, MAX_TAKE, MIN_TAKE};

    #[test]
    fn take_accepts_out_of_range_integers() {
        assert_eq!(parse_take(Some("999")).unwrap(), Some(999));
        assert_eq!(parse_take(Some("0")).unwrap(), Some(0));
        assert_eq!(parse_take(None).unwrap(), None);
    }

    #[test]
    fn take_rejects_non_integers() {
        assert_matches!(parse_take(Some("many")), Err(CoreError::Validation(_)));
        assert_matches!(parse_take(Some("-")), Err(CoreError::Validation(_)));
        assert_matches!(parse_take(Some("12.5")), Err(CoreError::Validation(_)));
    }

    #[test]
    fn take_beyond_i64_clamps_to_bounds() {
        let huge = parse_take(Some("99999999999999999999")).unwrap();
        assert_eq!(huge, Some(i64::MAX));
        assert_eq!(clamp_take(huge), MAX_TAKE);

        let tiny = parse_take(Some("-99999999999999999999")).unwrap();
        assert_eq!(tiny, Some(i64::MIN));
        assert_eq!(clamp_take(tiny), MIN_TAKE);
    }

    #[test]
    fn cursor_must_be_uuid() {
        assert_matches!(parse_cursor(Some("a2")), Err(CoreError::Validation(_)));
        let id = DbId::new_v4();
        assert_eq!(parse_cursor(Some(&id.to_string())).unwrap(), Some(id));
        assert_eq!(parse_cursor(Some("")).unwrap(), None);
    }
}
