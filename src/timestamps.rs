use chrono::{DateTime, NaiveDateTime, Utc};

/// Naive layouts written by older snapshots (no offset, assumed UTC)
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp.
///
/// RFC 3339 strings keep their offset and are converted to UTC. Naive
/// timestamps are interpreted as UTC. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Current time as written into snapshots and payloads
pub fn now_iso(now: DateTime<Utc>) -> String {
    now.to_rfc3339()
}
