//! Date-key codec.
//!
//! Facts reference the calendar dimension by an integer `YYYYMMDD` key.
//! The key of a missing or unparseable timestamp is the sentinel `0`, which
//! no real calendar date can produce, so a fact row never loses its date
//! column to a bad extract value.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Timestamp layouts seen across the raw extracts.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a cell as a timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (space or `T` separated, optional
/// fractional seconds) and bare `YYYY-MM-DD` dates. Anything else, including
/// null and empty cells, is `None`.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    let s = match value {
        Value::String(s) => s.trim(),
        _ => return None,
    };
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Encode a date as its integer `YYYYMMDD` key.
pub fn key_of_date(date: NaiveDate) -> i64 {
    date.format("%Y%m%d")
        .to_string()
        .parse()
        .unwrap_or_default()
}

/// Encode a cell as a date key, discarding the time of day.
///
/// Missing and unparseable values collapse to `0`.
pub fn date_key(value: &Value) -> i64 {
    parse_timestamp(value)
        .map(|dt| key_of_date(dt.date()))
        .unwrap_or(0)
}

/// Decode a date key back to a calendar date.
///
/// The sentinel `0` and malformed keys decode to `None`.
pub fn date_of_key(key: i64) -> Option<NaiveDate> {
    if key <= 0 {
        return None;
    }
    let year = (key / 10_000) as i32;
    let month = ((key / 100) % 100) as u32;
    let day = (key % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_from_datetime() {
        assert_eq!(date_key(&json!("2024-05-17 14:32:05")), 20240517);
        assert_eq!(date_key(&json!("2024-05-17T14:32:05")), 20240517);
        assert_eq!(date_key(&json!("2024-05-17T14:32:05.250")), 20240517);
    }

    #[test]
    fn test_key_from_bare_date() {
        assert_eq!(date_key(&json!("2023-01-02")), 20230102);
    }

    #[test]
    fn test_key_from_rfc3339() {
        assert_eq!(date_key(&json!("2024-05-17T14:32:05+03:00")), 20240517);
    }

    #[test]
    fn test_time_of_day_discarded() {
        assert_eq!(
            date_key(&json!("2024-01-01 00:00:00")),
            date_key(&json!("2024-01-01 23:59:59"))
        );
    }

    #[test]
    fn test_unparseable_collapses_to_sentinel() {
        assert_eq!(date_key(&json!("")), 0);
        assert_eq!(date_key(&json!("not a date")), 0);
        assert_eq!(date_key(&json!("17/05/2024")), 0);
        assert_eq!(date_key(&Value::Null), 0);
    }

    #[test]
    fn test_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(date_of_key(key_of_date(date)), Some(date));
    }

    #[test]
    fn test_sentinel_decodes_to_none() {
        assert_eq!(date_of_key(0), None);
        assert_eq!(date_of_key(20241345), None);
    }
}
