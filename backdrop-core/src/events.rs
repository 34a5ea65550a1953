//! Inbound weather notifications.
//!
//! Payloads come from loosely typed producers (weather modules, home
//! automation bridges), so every field is read leniently: wrong types count
//! as absent rather than failing the whole notification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::scene::{OverrideRequest, SunTimes};

/// Raw condition string or code for the current weather.
pub const CURRENT_WEATHER_TYPE: &str = "CURRENTWEATHER_TYPE";
/// Full weather update carrying sunrise/sunset and a condition.
pub const WEATHER_UPDATED: &str = "WEATHER_UPDATED";
/// Alternate source with an explicit daytime flag.
pub const AMBIENT_WEATHER_DATA: &str = "AMBIENT_WEATHER_DATA";
/// Activates the manual override.
pub const BACKGROUND_SET: &str = "ANIMATED_WEATHER_BACKGROUND_SET";
/// Deactivates the manual override.
pub const BACKGROUND_CLEAR: &str = "ANIMATED_WEATHER_BACKGROUND_CLEAR";

/// A notification as delivered by a host: a name plus an arbitrary payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationEnvelope {
    pub notification: String,
    #[serde(default)]
    pub payload: Value,
}

/// Ambient weather reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmbientWeather {
    pub condition: Option<String>,
    pub is_daytime: Option<bool>,
    pub sun_times: SunTimes,
}

/// A decoded inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherEvent {
    WeatherType {
        condition: Option<String>,
    },
    WeatherUpdated {
        weather_type: Option<String>,
        sun_times: SunTimes,
    },
    AmbientWeather(AmbientWeather),
    ManualSet(OverrideRequest),
    ManualClear,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherTypePayload {
    #[serde(default, rename = "type")]
    kind: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeatherUpdatedPayload {
    #[serde(default)]
    current_weather: Option<CurrentWeatherPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentWeatherPayload {
    #[serde(default)]
    weather_type: Value,
    #[serde(default)]
    sunrise: Value,
    #[serde(default)]
    sunset: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmbientPayload {
    #[serde(default)]
    condition: Value,
    #[serde(default)]
    condition_code: Value,
    #[serde(default)]
    icon: Value,
    #[serde(default)]
    weather: Value,
    #[serde(default)]
    is_daytime: Value,
    #[serde(default)]
    sunrise: Value,
    #[serde(default)]
    sunset: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualSetPayload {
    #[serde(default)]
    scene: Value,
    #[serde(default)]
    sprite_url: Value,
    #[serde(default)]
    is_night: Value,
    #[serde(default)]
    playback_rate: Value,
}

/// Non-empty string, or a numeric code rendered as text.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decode<T: for<'de> Deserialize<'de>>(name: &str, payload: &Value) -> Result<T> {
    serde_json::from_value(payload.clone())
        .map_err(|e| Error::EventPayload(name.to_string(), e.to_string()))
}

impl WeatherEvent {
    /// Decodes a host notification.
    ///
    /// Returns `Ok(None)` for notifications the engine does not handle
    /// (including suspend/resume) and for payload-less events that carry
    /// nothing to act on. Returns an error only when the payload has the
    /// wrong shape entirely (e.g. a string where an object is expected).
    pub fn from_notification(name: &str, payload: &Value) -> Result<Option<Self>> {
        let event = match name {
            CURRENT_WEATHER_TYPE => {
                let p: WeatherTypePayload = if payload.is_null() {
                    WeatherTypePayload::default()
                } else {
                    decode(name, payload)?
                };
                Some(WeatherEvent::WeatherType {
                    condition: value_text(&p.kind),
                })
            }
            WEATHER_UPDATED if !payload.is_null() => {
                let p: WeatherUpdatedPayload = decode(name, payload)?;
                p.current_weather.map(|cw| WeatherEvent::WeatherUpdated {
                    weather_type: value_text(&cw.weather_type),
                    sun_times: SunTimes::from_values(&cw.sunrise, &cw.sunset),
                })
            }
            AMBIENT_WEATHER_DATA if !payload.is_null() => {
                let p: AmbientPayload = decode(name, payload)?;
                let condition = [&p.condition, &p.condition_code, &p.icon, &p.weather]
                    .into_iter()
                    .find_map(value_text);
                Some(WeatherEvent::AmbientWeather(AmbientWeather {
                    condition,
                    is_daytime: p.is_daytime.as_bool(),
                    sun_times: SunTimes::from_values(&p.sunrise, &p.sunset),
                }))
            }
            BACKGROUND_SET if !payload.is_null() => {
                let p: ManualSetPayload = decode(name, payload)?;
                Some(WeatherEvent::ManualSet(OverrideRequest {
                    scene: value_text(&p.scene),
                    sprite_url: value_text(&p.sprite_url),
                    is_night: p.is_night.as_bool(),
                    playback_rate: p.playback_rate.as_f64(),
                }))
            }
            BACKGROUND_CLEAR => Some(WeatherEvent::ManualClear),
            _ => None,
        };

        if event.is_none() {
            tracing::debug!("Ignoring notification {}", name);
        }
        Ok(event)
    }

    /// Decodes an envelope.
    pub fn from_envelope(envelope: &NotificationEnvelope) -> Result<Option<Self>> {
        Self::from_notification(&envelope.notification, &envelope.payload)
    }

    /// The wire name this event is delivered under.
    pub fn notification_name(&self) -> &'static str {
        match self {
            WeatherEvent::WeatherType { .. } => CURRENT_WEATHER_TYPE,
            WeatherEvent::WeatherUpdated { .. } => WEATHER_UPDATED,
            WeatherEvent::AmbientWeather(_) => AMBIENT_WEATHER_DATA,
            WeatherEvent::ManualSet(_) => BACKGROUND_SET,
            WeatherEvent::ManualClear => BACKGROUND_CLEAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_ok(name: &str, payload: Value) -> Option<WeatherEvent> {
        WeatherEvent::from_notification(name, &payload).unwrap()
    }

    #[test]
    fn test_weather_type() {
        assert_eq!(
            decode_ok(CURRENT_WEATHER_TYPE, json!({"type": "night-rain"})),
            Some(WeatherEvent::WeatherType {
                condition: Some("night-rain".to_string())
            })
        );
        assert_eq!(
            decode_ok(CURRENT_WEATHER_TYPE, json!(null)),
            Some(WeatherEvent::WeatherType { condition: None })
        );
        assert_eq!(
            decode_ok(CURRENT_WEATHER_TYPE, json!({"type": ""})),
            Some(WeatherEvent::WeatherType { condition: None })
        );
    }

    #[test]
    fn test_weather_updated() {
        let event = decode_ok(
            WEATHER_UPDATED,
            json!({"currentWeather": {"weatherType": "snow", "sunrise": 100, "sunset": "bogus"}}),
        );
        assert_eq!(
            event,
            Some(WeatherEvent::WeatherUpdated {
                weather_type: Some("snow".to_string()),
                sun_times: SunTimes::new(Some(100), None),
            })
        );
        assert_eq!(decode_ok(WEATHER_UPDATED, json!({"other": 1})), None);
        assert_eq!(decode_ok(WEATHER_UPDATED, json!(null)), None);
    }

    #[test]
    fn test_ambient_condition_fallbacks() {
        let event = decode_ok(
            AMBIENT_WEATHER_DATA,
            json!({"condition": "", "conditionCode": 511, "icon": "rain", "isDaytime": false}),
        );
        let Some(WeatherEvent::AmbientWeather(ambient)) = event else {
            panic!("expected ambient event");
        };
        assert_eq!(ambient.condition.as_deref(), Some("511"));
        assert_eq!(ambient.is_daytime, Some(false));
        assert_eq!(ambient.sun_times, SunTimes::default());
    }

    #[test]
    fn test_ambient_non_bool_daytime_is_absent() {
        let event = decode_ok(AMBIENT_WEATHER_DATA, json!({"weather": "fog", "isDaytime": "yes"}));
        let Some(WeatherEvent::AmbientWeather(ambient)) = event else {
            panic!("expected ambient event");
        };
        assert_eq!(ambient.condition.as_deref(), Some("fog"));
        assert_eq!(ambient.is_daytime, None);
    }

    #[test]
    fn test_manual_set_and_clear() {
        let event = decode_ok(
            BACKGROUND_SET,
            json!({"spriteUrl": "https://x.test/a.mp4", "isNight": true, "playbackRate": 0.5}),
        );
        assert_eq!(
            event,
            Some(WeatherEvent::ManualSet(OverrideRequest {
                scene: None,
                sprite_url: Some("https://x.test/a.mp4".to_string()),
                is_night: Some(true),
                playback_rate: Some(0.5),
            }))
        );
        assert_eq!(decode_ok(BACKGROUND_CLEAR, json!(null)), Some(WeatherEvent::ManualClear));
        assert_eq!(decode_ok(BACKGROUND_SET, json!(null)), None);
    }

    #[test]
    fn test_unknown_notifications_ignored() {
        assert_eq!(decode_ok("MODULE_SUSPENDED", json!({})), None);
        assert_eq!(decode_ok("CLOCK_SECOND", json!(12)), None);
    }

    #[test]
    fn test_wrong_payload_shape_is_error() {
        let result = WeatherEvent::from_notification(AMBIENT_WEATHER_DATA, &json!("rain"));
        assert!(matches!(result, Err(Error::EventPayload(_, _))));
    }

    #[test]
    fn test_envelope_round_trip_name() {
        let envelope: NotificationEnvelope =
            serde_json::from_str(r#"{"notification": "ANIMATED_WEATHER_BACKGROUND_CLEAR"}"#).unwrap();
        let event = WeatherEvent::from_envelope(&envelope).unwrap().unwrap();
        assert_eq!(event.notification_name(), BACKGROUND_CLEAR);
    }
}
