//! Wire timestamps
//!
//! The build API's timestamps are informational and not always RFC 3339
//! (running jobs send an empty `endTime`, some records carry epoch seconds).
//! They are kept as raw text and parsed only when displayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a timestamp field of any shape into its raw text
///
/// Strings are kept as-is, numbers are kept in their JSON form, and empty
/// strings, `null` or other shapes become `None`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Best-effort parse of a raw timestamp: RFC 3339, then epoch seconds
pub fn parse(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }

    let seconds = raw.parse::<f64>().ok().filter(|secs| secs.is_finite())?;
    DateTime::from_timestamp_millis((seconds * 1000.0) as i64)
}
