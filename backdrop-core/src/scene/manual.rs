//! Manual override gate: a caller-forced scene or raw media URL that
//! supersedes weather-driven selection until cleared.

use serde::{Deserialize, Serialize};

use super::daylight::{resolve_night, SunTimes};
use super::key::SceneKey;
use super::resolver::{valid_rate, SpriteResolver};
use super::state::SceneRequest;
use crate::error::{Error, Result};

/// A request to force a scene. At least one of `scene` and `sprite_url` is required.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OverrideRequest {
    #[serde(default)]
    pub scene: Option<String>,
    #[serde(default)]
    pub sprite_url: Option<String>,
    #[serde(default)]
    pub is_night: Option<bool>,
    #[serde(default)]
    pub playback_rate: Option<f64>,
}

impl OverrideRequest {
    pub fn scene(scene: impl Into<String>) -> Self {
        Self {
            scene: Some(scene.into()),
            ..Default::default()
        }
    }

    pub fn sprite_url(url: impl Into<String>) -> Self {
        Self {
            sprite_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_night(mut self, is_night: bool) -> Self {
        self.is_night = Some(is_night);
        self
    }

    pub fn with_playback_rate(mut self, rate: f64) -> Self {
        self.playback_rate = Some(rate);
        self
    }
}

/// An active manual override.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ManualOverride {
    pub scene: Option<SceneKey>,
    pub sprite_url: Option<String>,
    pub is_night: Option<bool>,
    /// Rate for a raw `sprite_url`. Table scenes keep their configured rate.
    pub playback_rate: f64,
}

impl ManualOverride {
    /// Scene key reported for this override (`manual` when only a URL was given).
    pub fn scene_key(&self) -> SceneKey {
        self.scene.clone().unwrap_or_else(SceneKey::manual)
    }

    /// Resolves the override into a scene request. Day/night uses the
    /// override's own flag if set, else sun times, else day.
    pub fn to_request(
        &self,
        resolver: &SpriteResolver,
        sun_times: &SunTimes,
        now_ms: i64,
    ) -> SceneRequest {
        let scene = self.scene_key();
        let is_night = resolve_night(self.is_night, None, sun_times, now_ms);
        let sprite = match &self.sprite_url {
            Some(url) => resolver.raw_sprite(url, Some(self.playback_rate)),
            None => resolver.resolve(&scene, is_night),
        };
        SceneRequest {
            scene,
            is_night,
            sprite,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Holds at most one active override.
#[derive(Debug, Clone, Default)]
pub struct OverrideGate {
    active: Option<ManualOverride>,
}

impl OverrideGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates an override, replacing any previous one.
    pub fn set(&mut self, request: OverrideRequest, default_rate: f64) -> Result<&ManualOverride> {
        let scene = non_empty(request.scene);
        let sprite_url = non_empty(request.sprite_url);
        if scene.is_none() && sprite_url.is_none() {
            return Err(Error::InvalidOverride(
                "either a scene or a sprite URL is required".to_string(),
            ));
        }

        let playback_rate = request
            .playback_rate
            .and_then(valid_rate)
            .or_else(|| valid_rate(default_rate))
            .unwrap_or(1.0);

        let manual = ManualOverride {
            scene: scene.map(SceneKey::from),
            sprite_url,
            is_night: request.is_night,
            playback_rate,
        };
        tracing::info!(
            "Manual override set: scene={} url={} night={:?} rate={}",
            manual.scene_key(),
            manual.sprite_url.as_deref().unwrap_or("none"),
            manual.is_night,
            manual.playback_rate
        );
        Ok(&*self.active.insert(manual))
    }

    /// Removes the active override, returning it.
    pub fn clear(&mut self) -> Option<ManualOverride> {
        let cleared = self.active.take();
        if cleared.is_some() {
            tracing::info!("Manual override cleared");
        }
        cleared
    }

    pub fn active(&self) -> Option<&ManualOverride> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
