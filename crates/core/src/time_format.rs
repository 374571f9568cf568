//! Wall-clock times travel as `HH:mm` strings on the wire.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

use crate::errors::{SlotbookError, SlotbookResult};

pub const WALL_TIME_FORMAT: &str = "%H:%M";

pub fn parse_wall_time(value: &str) -> SlotbookResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), WALL_TIME_FORMAT)
        .map_err(|_| SlotbookError::Validation(format!("Invalid time '{}', expected HH:mm", value)))
}

pub fn format_wall_time(time: &NaiveTime) -> String {
    time.format(WALL_TIME_FORMAT).to_string()
}

/// `#[serde(with = "hhmm")]` for `NaiveTime` fields.
pub mod hhmm {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_wall_time(time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_wall_time(&raw).map_err(serde::de::Error::custom)
    }
}
