//! Timestamp encoding shared by tasks and history entries.
//!
//! Timestamps are UTC with millisecond precision, serialized as
//! `2024-05-01T09:30:00.000Z`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Current time truncated to the precision that survives a save/load cycle.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_uses_millis_and_z_suffix() {
        let value = parse("2024-05-01T09:30:00Z").expect("parse");
        assert_eq!(format(&value), "2024-05-01T09:30:00.000Z");
    }

    #[test]
    fn parse_normalizes_offsets_to_utc() {
        let value = parse("2024-05-01T11:30:00.250+02:00").expect("parse");
        assert_eq!(format(&value), "2024-05-01T09:30:00.250Z");
    }

    #[test]
    fn now_survives_format_and_parse() {
        let value = now();
        assert_eq!(parse(&format(&value)), Some(value));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse("yesterday").is_none());
    }
}
