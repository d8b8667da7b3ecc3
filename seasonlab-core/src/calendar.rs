//! Week-of-year numbering and UTC date resolution.
//!
//! The week scheme here is the *simple* one: day 0 is January 1 and every
//! block of seven days is one week, so Jan 1–7 is week 1 regardless of
//! weekday. It is not ISO-8601 — there is no Monday alignment and no
//! week-year carry-over. The last one or two days of a year fall into a short
//! week 53 (Dec 31 always; Dec 30 as well in leap years).
//!
//! Everything operates on UTC calendar dates. Timestamps are converted with
//! UTC components only, so a host timezone can never shift a bar across a
//! week boundary.

use chrono::{DateTime, Datelike, NaiveDate};

/// Highest week number the simple scheme can produce.
pub const MAX_WEEK: u32 = 53;

/// Week-of-year index in `1..=53` for a UTC calendar date.
///
/// `ceil((day_of_year + 1) / 7)` with a 0-based `day_of_year`, which is the
/// same as `day_of_year / 7 + 1` in integer arithmetic.
pub fn week_number(date: NaiveDate) -> u32 {
    date.ordinal0() / 7 + 1
}

/// UTC calendar date of a Unix timestamp in seconds.
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn utc_date_from_timestamp(secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

/// UTC calendar date of an ISO date (`2024-01-07`) or RFC 3339 timestamp
/// (`2024-01-07T14:30:00-05:00`).
pub fn parse_utc_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_utc().date())
}
