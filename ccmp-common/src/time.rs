//! Timestamp utilities

use chrono::{DateTime, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp as a calendar date (`YYYY-MM-DD`, UTC)
pub fn ymd(timestamp: DateTime<Utc>) -> String {
    timestamp.date_naive().format("%Y-%m-%d").to_string()
}

/// Parse a remote creation timestamp into a UTC calendar date
///
/// Accepts RFC 3339 timestamps (`2024-03-01T08:15:00.000Z`) and bare
/// `YYYY-MM-DD` dates. Returns `None` for anything else.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
