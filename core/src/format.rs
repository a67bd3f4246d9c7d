//! Display helpers for server timestamps.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Render an ISO-8601 timestamp as e.g. `Mar 05, 2024, 14:30` (UTC).
/// Input that is not a timestamp is returned unchanged.
pub fn format_date(iso: &str) -> String {
    parse_timestamp(iso)
        .map(|dt| dt.format("%b %d, %Y, %H:%M").to_string())
        .unwrap_or_else(|| iso.to_string())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Some backends omit the offset; treat those as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}
