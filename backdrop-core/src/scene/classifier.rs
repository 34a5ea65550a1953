//! Maps free-text or coded weather conditions onto canonical scenes.

use std::sync::OnceLock;

use regex::Regex;

use super::key::SceneKey;

/// Condition patterns in priority order. The first match wins.
const SCENE_PATTERNS: &[(SceneKey, &str)] = &[
    (SceneKey::Thunderstorm, r"thunder|storm"),
    (SceneKey::Snow, r"snow"),
    (SceneKey::Sleet, r"sleet|hail"),
    (SceneKey::Rain, r"rain|shower|drizzle|sprinkle"),
    (SceneKey::Fog, r"fog|haze|mist"),
    (SceneKey::Wind, r"wind|breeze|tornado|hurricane"),
    (SceneKey::Cloudy, r"cloud|overcast"),
];

/// Within the cloudy family, selects partly cloudy over plain cloudy.
const PARTLY_PATTERN: &str = r"partly|sunny[-_\s]?overcast|broken";

static SCENE_REGEXES: OnceLock<Vec<(SceneKey, Regex)>> = OnceLock::new();
static PARTLY_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// Result of classifying a raw condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub scene: SceneKey,
    /// True when the condition text mentions "night". Only a hint: explicit
    /// day/night signals and sun times take precedence.
    pub is_night_hint: bool,
}

fn scene_regexes() -> &'static [(SceneKey, Regex)] {
    SCENE_REGEXES.get_or_init(|| {
        SCENE_PATTERNS
            .iter()
            .filter_map(|(scene, pattern)| {
                Regex::new(pattern).ok().map(|re| (scene.clone(), re))
            })
            .collect()
    })
}

fn is_partly(raw: &str) -> bool {
    PARTLY_REGEX
        .get_or_init(|| Regex::new(PARTLY_PATTERN).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(raw))
}

/// Classifies a raw weather condition (e.g. `"night-showers"`, `"Partly Cloudy"`).
///
/// Empty, missing or unrecognized conditions classify as `clear`.
pub fn classify(raw_condition: Option<&str>) -> Classification {
    let raw = raw_condition.unwrap_or_default().to_lowercase();
    let is_night_hint = raw.contains("night");

    let scene = scene_regexes()
        .iter()
        .find(|(_, re)| re.is_match(&raw))
        .map(|(scene, _)| match scene {
            SceneKey::Cloudy if is_partly(&raw) => SceneKey::PartlyCloudy,
            other => other.clone(),
        })
        .unwrap_or(SceneKey::Clear);

    Classification {
        scene,
        is_night_hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_of(raw: &str) -> SceneKey {
        classify(Some(raw)).scene
    }

    #[test]
    fn test_empty_and_missing_are_clear() {
        for result in [classify(None), classify(Some(""))] {
            assert_eq!(result.scene, SceneKey::Clear);
            assert!(!result.is_night_hint);
        }
    }

    #[test]
    fn test_unrecognized_is_clear() {
        assert_eq!(scene_of("day-sunny"), SceneKey::Clear);
        assert_eq!(scene_of("800"), SceneKey::Clear);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(scene_of("thundersnow"), SceneKey::Thunderstorm);
        assert_eq!(scene_of("snow showers"), SceneKey::Snow);
        assert_eq!(scene_of("rain and hail"), SceneKey::Sleet);
        assert_eq!(scene_of("misty drizzle"), SceneKey::Rain);
        assert_eq!(scene_of("windy fog"), SceneKey::Fog);
        assert_eq!(scene_of("cloudy with breeze"), SceneKey::Wind);
    }

    #[test]
    fn test_each_family() {
        assert_eq!(scene_of("day-thunderstorm"), SceneKey::Thunderstorm);
        assert_eq!(scene_of("snow"), SceneKey::Snow);
        assert_eq!(scene_of("sleet"), SceneKey::Sleet);
        assert_eq!(scene_of("night-sprinkle"), SceneKey::Rain);
        assert_eq!(scene_of("haze"), SceneKey::Fog);
        assert_eq!(scene_of("hurricane"), SceneKey::Wind);
        assert_eq!(scene_of("overcast"), SceneKey::Cloudy);
    }

    #[test]
    fn test_partly_cloudy_variants() {
        assert_eq!(scene_of("Partly Cloudy"), SceneKey::PartlyCloudy);
        assert_eq!(scene_of("day-sunny-overcast"), SceneKey::PartlyCloudy);
        assert_eq!(scene_of("sunny_overcast"), SceneKey::PartlyCloudy);
        assert_eq!(scene_of("broken clouds"), SceneKey::PartlyCloudy);
        assert_eq!(scene_of("night-cloudy"), SceneKey::Cloudy);
    }

    #[test]
    fn test_partly_without_cloud_is_clear() {
        // The secondary pattern only applies inside the cloudy family.
        assert_eq!(scene_of("partly sunny"), SceneKey::Clear);
    }

    #[test]
    fn test_night_hint() {
        assert!(classify(Some("NIGHT-CLEAR")).is_night_hint);
        assert!(classify(Some("night-alt-rain")).is_night_hint);
        assert!(!classify(Some("day-rain")).is_night_hint);
    }
}
