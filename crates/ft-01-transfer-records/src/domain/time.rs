//! # Ledger Time
//!
//! Record timestamps are stored with whole-second precision in the
//! `YYYY-MM-DD HH:MM:SS` layout (UTC), so records written by hosts with
//! different clock resolutions compare equal.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

/// Instant used throughout the subsystem.
pub type Timestamp = DateTime<Utc>;

/// Layout of record creation/completion times.
pub const RECORD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Drop everything below whole seconds.
pub fn truncate_to_seconds(ts: Timestamp) -> Timestamp {
    ts.trunc_subsecs(0)
}

/// Format an instant as a record time.
pub fn format_record_time(ts: &Timestamp) -> String {
    ts.format(RECORD_TIME_FORMAT).to_string()
}

/// Parse a record time.
pub fn parse_record_time(value: &str) -> Result<Timestamp, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, RECORD_TIME_FORMAT).map(|naive| naive.and_utc())
}

/// Convert a ledger `(seconds, nanos)` pair into an instant.
pub fn from_ledger_parts(seconds: i64, nanos: i32) -> Option<Timestamp> {
    let nanos = u32::try_from(nanos).ok()?;
    DateTime::from_timestamp(seconds, nanos)
}

/// Serde adapter for optional record times.
///
/// Older records store an unset time as `""`; that decodes to `None`.
pub mod record_time_opt {
    use super::*;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        ts: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_str(&format_record_time(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(value) if value.is_empty() => Ok(None),
            Some(value) => parse_record_time(&value).map(Some).map_err(D::Error::custom),
        }
    }
}
