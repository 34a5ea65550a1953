//! Canonical scene identifiers.

use serde::{Deserialize, Serialize};

/// Weather category driving backdrop selection.
///
/// The classifier only ever produces the named variants; `Custom` carries
/// caller-supplied keys from manual overrides (including `manual`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SceneKey {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Sleet,
    Thunderstorm,
    Snow,
    Fog,
    Wind,
    Default,
    Custom(String),
}

impl SceneKey {
    /// Key used when a manual override only supplies a raw media URL.
    pub const MANUAL: &'static str = "manual";

    pub fn as_str(&self) -> &str {
        match self {
            SceneKey::Clear => "clear",
            SceneKey::PartlyCloudy => "partly_cloudy",
            SceneKey::Cloudy => "cloudy",
            SceneKey::Rain => "rain",
            SceneKey::Sleet => "sleet",
            SceneKey::Thunderstorm => "thunderstorm",
            SceneKey::Snow => "snow",
            SceneKey::Fog => "fog",
            SceneKey::Wind => "wind",
            SceneKey::Default => "default",
            SceneKey::Custom(key) => key,
        }
    }

    /// Returns all classifier scenes plus `default`, in table order.
    pub fn all() -> &'static [SceneKey] {
        &[
            SceneKey::Clear,
            SceneKey::PartlyCloudy,
            SceneKey::Cloudy,
            SceneKey::Rain,
            SceneKey::Sleet,
            SceneKey::Thunderstorm,
            SceneKey::Snow,
            SceneKey::Fog,
            SceneKey::Wind,
            SceneKey::Default,
        ]
    }

    /// Parse from string. Unknown keys become `Custom`.
    pub fn parse(s: &str) -> Self {
        match s {
            "clear" => SceneKey::Clear,
            "partly_cloudy" => SceneKey::PartlyCloudy,
            "cloudy" => SceneKey::Cloudy,
            "rain" => SceneKey::Rain,
            "sleet" => SceneKey::Sleet,
            "thunderstorm" => SceneKey::Thunderstorm,
            "snow" => SceneKey::Snow,
            "fog" => SceneKey::Fog,
            "wind" => SceneKey::Wind,
            "default" => SceneKey::Default,
            other => SceneKey::Custom(other.to_string()),
        }
    }

    pub fn manual() -> Self {
        SceneKey::Custom(Self::MANUAL.to_string())
    }
}

impl Default for SceneKey {
    fn default() -> Self {
        SceneKey::Default
    }
}

impl From<String> for SceneKey {
    fn from(s: String) -> Self {
        SceneKey::parse(&s)
    }
}

impl From<&str> for SceneKey {
    fn from(s: &str) -> Self {
        SceneKey::parse(s)
    }
}

impl From<SceneKey> for String {
    fn from(key: SceneKey) -> Self {
        key.as_str().to_string()
    }
}

impl std::fmt::Display for SceneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
