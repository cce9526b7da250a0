//! Date normalization for the heterogeneous values news sites publish.
//!
//! Raw date values arrive as epoch-millisecond strings, ISO 8601 timestamps,
//! bare dates, or natural-language forms like `May 1, 2024` — and sometimes
//! not at all. [`normalize`] turns any of them into a calendar date, falling
//! back to today's date when parsing fails. The fallback is a soft condition:
//! it is logged and flagged on the result, never raised as an error.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use tracing::warn;

/// Date-only formats attempted after the ISO 8601 parses fail.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Date-time formats without an offset, as some sites emit.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// A normalized calendar date plus whether it came from the fallback.
///
/// `defaulted` lets callers tell a genuinely parsed date apart from the
/// "today" stand-in; downstream consumers that care about chronological
/// fidelity should not treat the two as equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDate {
    pub date: NaiveDate,
    pub defaulted: bool,
}

/// Normalize a raw date value into a calendar date.
///
/// Parse order:
/// 1. All-digit input is an epoch timestamp in **milliseconds**, UTC.
/// 2. RFC 3339 / ISO 8601 (`2024-05-01T00:00:00Z`, offset forms).
/// 3. Common date and date-time formats ([`DATE_FORMATS`],
///    [`DATETIME_FORMATS`]).
/// 4. Anything else — including absent or empty input — yields today's date
///    with `defaulted` set.
pub fn normalize(raw: Option<&str>) -> NormalizedDate {
    let trimmed = raw.map(str::trim).unwrap_or("");

    if let Some(date) = parse(trimmed) {
        return NormalizedDate { date, defaulted: false };
    }

    if !trimmed.is_empty() {
        warn!(raw = trimmed, "Unparsable date value; defaulting to today");
    }
    NormalizedDate { date: Local::now().date_naive(), defaulted: true }
}

fn parse(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) {
        let millis: i64 = raw.parse().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    None
}
