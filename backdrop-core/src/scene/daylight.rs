//! Day/night resolution and sunrise/sunset timestamp normalization.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Sunrise and sunset as epoch milliseconds. Replaced wholesale on every
/// weather update; a missing or unparseable value is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SunTimes {
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

impl SunTimes {
    pub fn new(sunrise: Option<i64>, sunset: Option<i64>) -> Self {
        Self { sunrise, sunset }
    }

    /// Builds sun times from raw payload values (numbers, date strings, null).
    pub fn from_values(sunrise: &serde_json::Value, sunset: &serde_json::Value) -> Self {
        Self {
            sunrise: parse_timestamp(sunrise),
            sunset: parse_timestamp(sunset),
        }
    }

    /// Returns true if both sunrise and sunset are known.
    pub fn is_known(&self) -> bool {
        self.sunrise.is_some() && self.sunset.is_some()
    }

    /// Night outside today's sunrise..sunset window, or `None` when either
    /// bound is unknown. After sunset counts as night until the next update
    /// brings new sun times; there is no roll-forward to tomorrow's sunrise.
    pub fn is_night_at(&self, now_ms: i64) -> Option<bool> {
        match (self.sunrise, self.sunset) {
            (Some(sunrise), Some(sunset)) => Some(now_ms < sunrise || now_ms > sunset),
            _ => None,
        }
    }
}

/// Resolves whether it is night.
///
/// Priority: an explicit flag from the caller, then the sunrise/sunset
/// window, then the classifier's hint, then day.
pub fn resolve_night(
    explicit: Option<bool>,
    hint: Option<bool>,
    sun_times: &SunTimes,
    now_ms: i64,
) -> bool {
    if let Some(flag) = explicit {
        return flag;
    }
    if let Some(night) = sun_times.is_night_at(now_ms) {
        return night;
    }
    hint.unwrap_or(false)
}

/// Normalizes a timestamp payload value to epoch milliseconds.
///
/// Numbers are taken as epoch milliseconds; strings go through
/// [`parse_timestamp_str`]. Anything else is unknown.
pub fn parse_timestamp(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        serde_json::Value::String(s) => parse_timestamp_str(s),
        _ => None,
    }
}

/// Parses a date string to epoch milliseconds.
///
/// Accepts RFC 3339, RFC 2822, ISO-like date/time forms and long-form dates
/// such as `June 1, 2024 05:30:00`. Forms without a zone or offset are read
/// as UTC, not host-local time. Bare digit strings are not dates and yield
/// `None`; send epoch milliseconds as JSON numbers instead.
pub fn parse_timestamp_str(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%B %d, %Y %H:%M:%S",
        "%B %d, %Y %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc().timestamp_millis());
    }

    tracing::debug!("Unparseable timestamp '{}', treating as unknown", raw);
    None
}
