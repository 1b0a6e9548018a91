//! Timestamp parsing for extract columns.
//!
//! Source extracts carry timestamps as `YYYY-MM-DD HH:MM:SS` text, sometimes
//! with fractional seconds, a `T` separator, or only a date. Parsing never
//! fails loudly: anything unrecognised becomes `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{AnyValue, TimeUnit};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a timestamp from text, returning `None` when it is blank or malformed.
///
/// # Examples
///
/// ```
/// use mimic_common::parse_timestamp;
///
/// assert!(parse_timestamp("2180-05-06 22:23:00").is_some());
/// assert!(parse_timestamp("2180-05-06").is_some());
/// assert!(parse_timestamp("not a date").is_none());
/// assert!(parse_timestamp("").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(value);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Convert a Polars physical datetime value to a naive timestamp.
pub fn timestamp_from_unit(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let parsed = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    parsed.map(|dt| dt.naive_utc())
}

/// Read a timestamp out of any cell, parsing text cells as needed.
pub fn any_to_datetime(value: AnyValue<'_>) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Null => None,
        AnyValue::Datetime(v, unit, _) => timestamp_from_unit(v, unit),
        AnyValue::DatetimeOwned(v, unit, _) => timestamp_from_unit(v, unit),
        AnyValue::Date(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(i64::from(days))))
            .and_then(|date| date.and_hms_opt(0, 0, 0)),
        AnyValue::String(s) => parse_timestamp(s),
        AnyValue::StringOwned(s) => parse_timestamp(&s),
        _ => None,
    }
}

/// Format a timestamp the way the source extracts write them.
pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}
