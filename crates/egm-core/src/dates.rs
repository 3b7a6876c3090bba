//! Serde helpers for the timestamp format used in persisted datasets.
//!
//! Sensor readings and alerts carry second-resolution timestamps in the
//! `YYYY-MM-DD HH:MM:SS` form (space-separated, no timezone). Dates use
//! chrono's default `YYYY-MM-DD` serialization and need no helper.

use chrono::NaiveDateTime;
use serde::{self, Deserialize, Deserializer, Serializer};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Use with `#[serde(with = "egm_core::dates::timestamp")]`.
pub mod timestamp {
    use super::*;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
