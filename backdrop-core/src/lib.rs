//! Backdrop Core - decision engine for animated weather video backdrops.
//!
//! This library provides:
//! - Configuration loading and validation for the scene-to-video table
//! - Weather classification and day/night resolution
//! - Scene resolution with default fallback and media validation
//! - A scene state machine that avoids redundant reloads
//! - A manual override gate
//! - FFI layer for embedding in non-Rust hosts
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use backdrop_core::config::ConfigLoader;
//! use backdrop_core::engine::BackdropEngine;
//! use backdrop_core::sink::CommandQueue;
//!
//! let config = ConfigLoader::new().load(Path::new("config/backdrop.yaml")).unwrap();
//! let mut engine = BackdropEngine::new(config, CommandQueue::new());
//!
//! engine.handle_weather_type(Some("night-showers"));
//! for command in engine.sink_mut().drain() {
//!     println!("{:?}", command);
//! }
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod ffi;
pub mod scene;
pub mod sink;

pub use error::{Error, Result};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::{BackdropConfig, ConfigLoader, SpriteEntry, SpriteTable};
    pub use crate::engine::{BackdropEngine, EngineSnapshot, WeatherObservation};
    pub use crate::error::{Error, Result};
    pub use crate::events::{AmbientWeather, NotificationEnvelope, WeatherEvent};
    pub use crate::scene::{
        classify, resolve_night, MediaType, OverrideRequest, SceneKey, SceneState, SpriteInfo,
        SunTimes, Transition,
    };
    pub use crate::sink::{CommandQueue, PlaybackSink, SinkCommand};
}
