//! Configuration types for the backdrop widget.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete backdrop configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackdropConfig {
    /// Scene to media table. Supplying it replaces the built-in table.
    #[serde(default = "SpriteTable::builtin", alias = "spriteSheets")]
    pub sprite_sheets: SpriteTable,
    /// Global playback rate for entries without their own.
    #[serde(default = "default_playback_rate", alias = "videoPlaybackRate")]
    pub video_playback_rate: f64,
    /// Base path that relative media paths are resolved against.
    #[serde(default = "default_asset_base", alias = "assetBase")]
    pub asset_base: String,
    /// Cosmetic: backdrop opacity (0.0-1.0).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Cosmetic: CSS blur length.
    #[serde(default = "default_blur")]
    pub blur: String,
    /// Cosmetic: vignette strength (0.0-1.0).
    #[serde(default = "default_vignette")]
    pub vignette: f64,
    /// Cross-fade duration in milliseconds.
    #[serde(default = "default_transition_speed", alias = "transitionSpeed")]
    pub transition_speed: u32,
    /// Full path to the source YAML file this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<std::path::PathBuf>,
}

fn default_playback_rate() -> f64 {
    1.0
}

fn default_asset_base() -> String {
    "modules/MMM-AnimatedWeatherBackgrounds".to_string()
}

fn default_opacity() -> f64 {
    0.7
}

fn default_blur() -> String {
    "1.5px".to_string()
}

fn default_vignette() -> f64 {
    0.32
}

fn default_transition_speed() -> u32 {
    800
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            sprite_sheets: SpriteTable::builtin(),
            video_playback_rate: default_playback_rate(),
            asset_base: default_asset_base(),
            opacity: default_opacity(),
            blur: default_blur(),
            vignette: default_vignette(),
            transition_speed: default_transition_speed(),
            source_path: None,
        }
    }
}

/// Media for one scene: a single URL for both day and night, or separate slots.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SpriteEntry {
    Single(String),
    Slots(SpriteSlots),
}

/// Day/night media slots with an optional per-scene playback rate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SpriteSlots {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub night: Option<String>,
    #[serde(default, alias = "playbackRate")]
    pub playback_rate: Option<f64>,
}

impl SpriteEntry {
    pub fn single(url: impl Into<String>) -> Self {
        SpriteEntry::Single(url.into())
    }

    pub fn pair(day: impl Into<String>, night: impl Into<String>) -> Self {
        SpriteEntry::Slots(SpriteSlots {
            day: Some(day.into()),
            night: Some(night.into()),
            playback_rate: None,
        })
    }

    pub fn slots(day: Option<&str>, night: Option<&str>, playback_rate: Option<f64>) -> Self {
        SpriteEntry::Slots(SpriteSlots {
            day: day.map(str::to_string),
            night: night.map(str::to_string),
            playback_rate,
        })
    }

    fn slot(&self, is_night: bool) -> Option<&str> {
        let url = match self {
            SpriteEntry::Single(url) => Some(url.as_str()),
            SpriteEntry::Slots(slots) if is_night => slots.night.as_deref(),
            SpriteEntry::Slots(slots) => slots.day.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }

    /// URL for the requested slot, falling back to the opposite slot.
    pub fn url_for(&self, is_night: bool) -> Option<&str> {
        self.slot(is_night).or_else(|| self.slot(!is_night))
    }

    pub fn playback_rate(&self) -> Option<f64> {
        match self {
            SpriteEntry::Single(_) => None,
            SpriteEntry::Slots(slots) => slots.playback_rate,
        }
    }
}

/// Mapping from scene key to media. Read-only once configured.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SpriteTable(HashMap<String, SpriteEntry>);

impl SpriteTable {
    /// Key of the entry used as the ultimate fallback.
    pub const DEFAULT_KEY: &'static str = "default";

    /// The built-in table shipped with the widget.
    pub fn builtin() -> Self {
        let mut table = Self::default();
        let clear = SpriteEntry::pair("videos/clear-day.mp4", "videos/clear-night.mp4");
        let cloudy = SpriteEntry::pair("videos/cloudy-day.mp4", "videos/cloudy-night.mp4");
        let rain = SpriteEntry::pair("videos/rain-day.mp4", "videos/rain-day.mp4");

        table.insert("clear", clear.clone());
        table.insert(
            "partly_cloudy",
            SpriteEntry::pair("videos/partly-cloudy-day.mp4", "videos/partly-cloudy-night.mp4"),
        );
        table.insert("cloudy", cloudy.clone());
        table.insert("rain", rain.clone());
        table.insert("sleet", rain.clone());
        table.insert("thunderstorm", rain);
        table.insert("snow", cloudy.clone());
        table.insert("fog", cloudy.clone());
        table.insert("wind", cloudy);
        table.insert(Self::DEFAULT_KEY, clear);
        table
    }

    pub fn insert(&mut self, scene: impl Into<String>, entry: SpriteEntry) {
        self.0.insert(scene.into(), entry);
    }

    pub fn get(&self, scene: &str) -> Option<&SpriteEntry> {
        self.0.get(scene)
    }

    pub fn default_entry(&self) -> Option<&SpriteEntry> {
        self.0.get(Self::DEFAULT_KEY)
    }

    /// Entry for the scene, or the default entry when the scene is absent.
    pub fn lookup(&self, scene: &str) -> Option<&SpriteEntry> {
        self.get(scene).or_else(|| self.default_entry())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpriteEntry)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
