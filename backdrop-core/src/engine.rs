//! Backdrop engine: runs each weather event through classification,
//! day/night resolution, media lookup and the scene state machine.
//!
//! Everything happens synchronously inside the call that delivers the event.
//! The engine owns the only mutable scene state, so hosts that share it
//! across threads wrap the whole engine in a lock.

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::BackdropConfig;
use crate::error::Result;
use crate::events::{AmbientWeather, WeatherEvent};
use crate::scene::{
    classify, resolve_night, ManualOverride, OverrideGate, OverrideRequest, SceneKey,
    SceneMachine, SceneState, SpriteResolver, SunTimes, Transition,
};
use crate::sink::PlaybackSink;

/// The most recent weather reading seen by the classifier pipeline.
/// Recorded even while a manual override is active.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WeatherObservation {
    pub condition: String,
    pub scene: SceneKey,
    pub is_night_hint: bool,
    /// Explicit day/night signal from the source (e.g. an `isDaytime` flag).
    pub explicit_night: Option<bool>,
}

impl WeatherObservation {
    fn new(condition: &str, explicit_night: Option<bool>) -> Self {
        let classification = classify(Some(condition));
        Self {
            condition: condition.to_string(),
            scene: classification.scene,
            is_night_hint: classification.is_night_hint,
            explicit_night,
        }
    }
}

/// Serializable view of the engine for hosts and debugging.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineSnapshot {
    pub scene: Option<SceneState>,
    pub sun_times: SunTimes,
    pub manual_override: Option<ManualOverride>,
    pub last_weather: Option<WeatherObservation>,
}

/// Drives a [`PlaybackSink`] from weather events.
pub struct BackdropEngine<S: PlaybackSink, C: Clock = SystemClock> {
    config: BackdropConfig,
    resolver: SpriteResolver,
    machine: SceneMachine,
    gate: OverrideGate,
    sun_times: SunTimes,
    last_weather: Option<WeatherObservation>,
    sink: S,
    clock: C,
}

impl<S: PlaybackSink> BackdropEngine<S, SystemClock> {
    /// Creates an engine on the system clock and shows the default scene.
    pub fn new(config: BackdropConfig, sink: S) -> Self {
        Self::with_clock(config, sink, SystemClock)
    }
}

impl<S: PlaybackSink, C: Clock> BackdropEngine<S, C> {
    /// Creates an engine with an explicit clock and shows the default scene.
    pub fn with_clock(config: BackdropConfig, sink: S, clock: C) -> Self {
        let resolver = SpriteResolver::from_config(&config);
        let mut engine = Self {
            config,
            resolver,
            machine: SceneMachine::new(),
            gate: OverrideGate::new(),
            sun_times: SunTimes::default(),
            last_weather: None,
            sink,
            clock,
        };

        // Seed something to show before the first weather notification lands
        let sprite = engine.resolver.resolve(&SceneKey::Default, false);
        engine
            .machine
            .apply(SceneKey::Default, false, sprite, &mut engine.sink);
        engine
    }

    /// Handles a decoded event. Returns `None` when the event carried nothing
    /// to act on.
    pub fn handle(&mut self, event: WeatherEvent) -> Option<Transition> {
        match event {
            WeatherEvent::WeatherType { condition } => self.handle_weather_type(condition.as_deref()),
            WeatherEvent::WeatherUpdated {
                weather_type,
                sun_times,
            } => self.handle_weather_update(weather_type.as_deref(), sun_times),
            WeatherEvent::AmbientWeather(ambient) => self.handle_ambient_weather(ambient),
            WeatherEvent::ManualSet(request) => match self.set_override(request) {
                Ok(transition) => Some(transition),
                Err(e) => {
                    tracing::warn!("Ignoring manual background request: {}", e);
                    None
                }
            },
            WeatherEvent::ManualClear => Some(self.clear_override()),
        }
    }

    /// Decodes and handles a host notification. Malformed payloads are
    /// logged and dropped; the current scene keeps playing.
    pub fn notify(&mut self, notification: &str, payload: &serde_json::Value) -> Option<Transition> {
        match WeatherEvent::from_notification(notification, payload) {
            Ok(event) => event.and_then(|event| self.handle(event)),
            Err(e) => {
                tracing::warn!("Ignoring notification: {}", e);
                None
            }
        }
    }

    /// Handles a raw condition string or code.
    pub fn handle_weather_type(&mut self, condition: Option<&str>) -> Option<Transition> {
        self.observe(condition, None)
    }

    /// Replaces the sun times, then handles the condition if one is present.
    pub fn handle_weather_update(
        &mut self,
        weather_type: Option<&str>,
        sun_times: SunTimes,
    ) -> Option<Transition> {
        self.sun_times = sun_times;
        weather_type.and_then(|condition| self.handle_weather_type(Some(condition)))
    }

    /// Handles an ambient reading. Its daytime flag beats the sun times.
    pub fn handle_ambient_weather(&mut self, ambient: AmbientWeather) -> Option<Transition> {
        self.sun_times = ambient.sun_times;
        let explicit_night = ambient.is_daytime.map(|daytime| !daytime);
        self.observe(ambient.condition.as_deref(), explicit_night)
    }

    fn observe(&mut self, condition: Option<&str>, explicit_night: Option<bool>) -> Option<Transition> {
        let condition = condition.filter(|c| !c.trim().is_empty());
        if let Some(condition) = condition {
            self.last_weather = Some(WeatherObservation::new(condition, explicit_night));
        }

        if self.gate.is_active() {
            tracing::debug!("Manual override active, weather-driven scene deferred");
            return self.apply_override();
        }
        if condition.is_none() {
            return None;
        }
        Some(self.apply_weather())
    }

    /// Forces a scene or raw media URL until [`clear_override`](Self::clear_override).
    pub fn set_override(&mut self, request: OverrideRequest) -> Result<Transition> {
        self.gate.set(request, self.resolver.default_rate())?;
        Ok(self.apply_override().unwrap_or(Transition::Rejected))
    }

    /// Drops the override and re-resolves the last weather reading.
    pub fn clear_override(&mut self) -> Transition {
        self.gate.clear();
        self.apply_weather()
    }

    /// Re-asserts playback of the current scene without reloading it, e.g.
    /// when the host re-renders. Returns false when nothing playable is showing.
    pub fn refresh(&mut self) -> bool {
        self.machine.resume(&mut self.sink)
    }

    /// Logs a playback failure reported by the sink. Never touches scene state.
    pub fn report_playback_failure(&self, url: &str, reason: &str) {
        tracing::warn!("Video playback failed for {}: {}", url, reason);
    }

    fn apply_override(&mut self) -> Option<Transition> {
        let request = self
            .gate
            .active()?
            .to_request(&self.resolver, &self.sun_times, self.clock.now_ms());
        Some(self.machine.apply_request(request, &mut self.sink))
    }

    fn apply_weather(&mut self) -> Transition {
        let now_ms = self.clock.now_ms();
        let (scene, is_night) = match &self.last_weather {
            Some(weather) => (
                weather.scene.clone(),
                resolve_night(
                    weather.explicit_night,
                    Some(weather.is_night_hint),
                    &self.sun_times,
                    now_ms,
                ),
            ),
            None => (
                SceneKey::Default,
                resolve_night(None, None, &self.sun_times, now_ms),
            ),
        };
        let sprite = self.resolver.resolve(&scene, is_night);
        self.machine.apply(scene, is_night, sprite, &mut self.sink)
    }

    pub fn current(&self) -> Option<&SceneState> {
        self.machine.current()
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn sun_times(&self) -> SunTimes {
        self.sun_times
    }

    pub fn active_override(&self) -> Option<&ManualOverride> {
        self.gate.active()
    }

    pub fn last_weather(&self) -> Option<&WeatherObservation> {
        self.last_weather.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            scene: self.machine.current().cloned(),
            sun_times: self.sun_times,
            manual_override: self.gate.active().cloned(),
            last_weather: self.last_weather.clone(),
        }
    }
}
