//! Resolves a (scene, day/night) pair to a playable media URL using the
//! configured sprite table.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::key::SceneKey;
use crate::config::{BackdropConfig, SpriteTable};

/// Supported video extensions, optionally followed by a query string.
const VIDEO_URL_PATTERN: &str = r"(?i)\.(mp4|webm|mov|m4v)(\?.*)?$";

/// URLs that are used as-is instead of being joined to the asset base.
const ABSOLUTE_URL_PATTERN: &str = r"(?i)^https?://";

/// Paths into any installed module's assets, served from the web root.
const MODULE_PATH_PATTERN: &str = r"(?i)^modules/";

static VIDEO_URL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static ABSOLUTE_URL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static MODULE_PATH_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// Returns true if the URL points at a supported video file.
pub fn is_video_url(url: &str) -> bool {
    VIDEO_URL_REGEX
        .get_or_init(|| Regex::new(VIDEO_URL_PATTERN).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(url))
}

fn is_module_path(path: &str) -> bool {
    MODULE_PATH_REGEX
        .get_or_init(|| Regex::new(MODULE_PATH_PATTERN).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(path))
}

fn is_absolute_url(url: &str) -> bool {
    ABSOLUTE_URL_REGEX
        .get_or_init(|| Regex::new(ABSOLUTE_URL_PATTERN).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(url))
}

/// Kind of media behind a resolved URL. Only video is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
}

impl MediaType {
    pub fn from_url(url: &str) -> Self {
        if is_video_url(url) {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }
}

/// A concrete media choice for a scene.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpriteInfo {
    pub url: String,
    pub media_type: MediaType,
    pub playback_rate: f64,
}

/// Returns the rate if it is usable as a playback rate.
pub(crate) fn valid_rate(rate: f64) -> Option<f64> {
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Sprite table lookup with default fallback and asset path normalization.
#[derive(Debug, Clone)]
pub struct SpriteResolver {
    table: SpriteTable,
    asset_base: String,
    default_rate: f64,
}

impl SpriteResolver {
    pub fn new(table: SpriteTable, asset_base: impl Into<String>, default_rate: f64) -> Self {
        Self {
            table,
            asset_base: asset_base.into(),
            default_rate: valid_rate(default_rate).unwrap_or(1.0),
        }
    }

    pub fn from_config(config: &BackdropConfig) -> Self {
        Self::new(
            config.sprite_sheets.clone(),
            config.asset_base.clone(),
            config.video_playback_rate,
        )
    }

    /// The global playback rate used when an entry or override has none.
    pub fn default_rate(&self) -> f64 {
        self.default_rate
    }

    pub fn table(&self) -> &SpriteTable {
        &self.table
    }

    /// Resolves the media for a scene.
    ///
    /// Unknown scenes use the `default` entry. A missing or non-video URL is
    /// retried once against `default`; if that fails too there is no media.
    pub fn resolve(&self, scene: &SceneKey, is_night: bool) -> Option<SpriteInfo> {
        let entry = self.table.lookup(scene.as_str());
        let playback_rate = entry
            .and_then(|e| e.playback_rate())
            .and_then(valid_rate)
            .unwrap_or(self.default_rate);

        let primary = entry
            .and_then(|e| e.url_for(is_night))
            .and_then(|path| self.normalize_url(path));

        let url = match primary {
            Some(url) if is_video_url(&url) => Some(url),
            primary => {
                let fallback = self
                    .table
                    .default_entry()
                    .and_then(|e| e.url_for(is_night))
                    .and_then(|path| self.normalize_url(path))
                    .filter(|url| is_video_url(url));
                tracing::warn!(
                    "No video media for scene \"{}\" ({}), configured: {}. Falling back to default video: {}",
                    scene,
                    day_or_night(is_night),
                    primary.as_deref().unwrap_or("none"),
                    fallback.as_deref().unwrap_or("none")
                );
                fallback
            }
        }?;

        Some(SpriteInfo {
            url,
            media_type: MediaType::Video,
            playback_rate,
        })
    }

    /// Builds media info for a raw URL supplied by a manual override.
    /// The URL is normalized but not looked up or validated.
    pub fn raw_sprite(&self, path: &str, playback_rate: Option<f64>) -> Option<SpriteInfo> {
        let url = self.normalize_url(path)?;
        Some(SpriteInfo {
            media_type: MediaType::from_url(&url),
            url,
            playback_rate: playback_rate
                .and_then(valid_rate)
                .unwrap_or(self.default_rate),
        })
    }

    /// Resolves a configured path against the asset base.
    ///
    /// Absolute URLs, data URLs and `/`-rooted paths pass through. Paths into
    /// any module's assets (`modules/...`) and paths already under the asset
    /// base are rooted instead of prefixed.
    pub fn normalize_url(&self, path: &str) -> Option<String> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        if is_absolute_url(path) || path.starts_with("data:") || path.starts_with('/') {
            return Some(path.to_string());
        }
        if is_module_path(path) {
            return Some(format!("/{}", path));
        }

        let base = self.asset_base.trim_end_matches('/');
        let relative_base = base.trim_start_matches('/');
        if relative_base.is_empty() {
            return Some(path.to_string());
        }
        if path
            .strip_prefix(relative_base)
            .map_or(false, |rest| rest.starts_with('/'))
        {
            return Some(format!("/{}", path));
        }

        Some(format!("{}/{}", base, path))
    }
}

pub(crate) fn day_or_night(is_night: bool) -> &'static str {
    if is_night {
        "night"
    } else {
        "day"
    }
}
