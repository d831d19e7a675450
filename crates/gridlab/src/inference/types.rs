//! Column type inference from the first row of a dataset.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::{Cell, Dataset};
use crate::schema::ColumnType;

/// ISO-like date prefix, or anything shaped like `...T...Z`.
static DATE_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}|.*T.*Z$").expect("valid date regex"));

/// Naive formats accepted after RFC 3339 fails.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Classify every column of the dataset.
///
/// Only the first row is consulted, so a column whose first value is `null`
/// or empty is reported as `String` whatever the later rows hold.
pub fn infer_column_types(data: &Dataset) -> IndexMap<String, ColumnType> {
    let Some(first) = data.rows.first() else {
        return IndexMap::new();
    };

    first
        .iter()
        .map(|(name, value)| (name.clone(), classify_value(value)))
        .collect()
}

/// Classify a single value.
pub fn classify_value(value: &Cell) -> ColumnType {
    match value {
        Cell::Number(_) => ColumnType::Number,
        Cell::Bool(_) => ColumnType::Boolean,
        Cell::Text(s) if DATE_LIKE.is_match(s) && parse_timestamp(s).is_some() => ColumnType::Date,
        _ => ColumnType::String,
    }
}

/// Parse a timestamp in the formats a browser's `Date.parse` reliably accepts.
///
/// Returns milliseconds since the Unix epoch; naive values are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<i64> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp_millis());
    }

    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
