//! Time of day helpers

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serializer};

use crate::{Error, Time};

/// Parse a `HH:MM:SS` (or `HH:MM`) string to seconds since midnight.
///
/// Hours past 23 are accepted, as timetables use them for services running
/// after midnight.
///
/// # Errors
///
/// Returns [`Error::InvalidTime`] if the string is not a valid time of day.
pub fn parse_time(time_str: &str) -> Result<Time, Error> {
    let trimmed = time_str.trim();

    let (hours, rest) = trimmed
        .split_once(':')
        .ok_or_else(|| Error::InvalidTime(time_str.to_string()))?;
    let hours: u32 = hours
        .parse()
        .map_err(|_| Error::InvalidTime(time_str.to_string()))?;

    // Let chrono validate minutes and seconds, the hour part is handled above
    let normalized = if rest.matches(':').count() == 0 {
        format!("00:{rest}:00")
    } else {
        format!("00:{rest}")
    };
    let clock = NaiveTime::parse_from_str(&normalized, "%H:%M:%S")
        .map_err(|_| Error::InvalidTime(time_str.to_string()))?;

    Ok(hours * 3600 + clock.minute() * 60 + clock.second())
}

/// Format seconds since midnight as `HH:MM:SS`
pub fn format_time(time: Time) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time / 3600,
        (time % 3600) / 60,
        time % 60
    )
}

pub fn deserialize_time<'de, D>(deserializer: D) -> Result<Time, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let time_str = String::deserialize(deserializer)?;
    parse_time(&time_str).map_err(serde::de::Error::custom)
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn serialize_time<S: Serializer>(time: &Time, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_time(*time))
}
