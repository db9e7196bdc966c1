use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

/// Rendering used for every date returned by the API, e.g. `Sun Jan 01 2023`
pub const DISPLAY_DATE_FORMAT: &str = "%a %b %d %Y";

const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognised date: {0:?}")]
pub struct DateParseError(pub String);

/// Only four digit years are accepted. Stored dates are compared as text,
/// which orders them correctly only within this range
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 0..=9999;

fn within_supported_years(date: DateTime<Utc>, input: String) -> Result<DateTime<Utc>, DateParseError> {
    if SUPPORTED_YEARS.contains(&date.year()) {
        Ok(date)
    } else {
        Err(DateParseError(input))
    }
}

fn parse_any_format(text: &str) -> Option<DateTime<Utc>> {
    if let Some(midnight) = NaiveDate::parse_from_str(text, NAIVE_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Some(midnight.and_utc());
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Some(date_time.with_timezone(&Utc));
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|date_time| date_time.and_utc())
}

/// Parses a caller supplied date.
///
/// Plain dates are taken as UTC midnight and date-times without an offset are
/// taken as UTC.
pub fn parse_date<T: AsRef<str>>(text: T) -> Result<DateTime<Utc>, DateParseError> {
    let text = text.as_ref().trim();

    let date = parse_any_format(text).ok_or_else(|| DateParseError(text.to_owned()))?;
    within_supported_years(date, text.to_owned())
}

/// Parses a date given as milliseconds since the unix epoch
pub fn parse_timestamp_millis(millis: i64) -> Result<DateTime<Utc>, DateParseError> {
    let date = DateTime::from_timestamp_millis(millis).ok_or_else(|| DateParseError(millis.to_string()))?;
    within_supported_years(date, millis.to_string())
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}
