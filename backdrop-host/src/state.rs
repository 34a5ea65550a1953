//! Host state: one engine plus the bookkeeping around it.

use std::path::Path;

use backdrop_core::config::{BackdropConfig, ConfigLoader};
use backdrop_core::engine::{BackdropEngine, EngineSnapshot};
use backdrop_core::events::WeatherEvent;
use backdrop_core::sink::{CommandQueue, SinkCommand};

use crate::commands::{parse_envelope, PlaybackFailure, BACKDROP_PLAYBACK_FAILED, BACKDROP_REFRESH};

/// Owns the engine and turns input lines into sink commands.
pub struct HostState {
    engine: BackdropEngine<CommandQueue>,
    handled: u64,
    skipped: u64,
}

impl HostState {
    pub fn new(config: BackdropConfig) -> Self {
        Self {
            engine: BackdropEngine::new(config, CommandQueue::new()),
            handled: 0,
            skipped: 0,
        }
    }

    /// Loads the config at `path`, or uses the built-in defaults when absent.
    pub fn from_config_path(path: Option<&Path>) -> backdrop_core::Result<Self> {
        let config = match path {
            Some(path) => ConfigLoader::new().load(path)?,
            None => {
                tracing::info!("No config given, using built-in sprite table");
                BackdropConfig::default()
            }
        };
        Ok(Self::new(config))
    }

    /// Handles one input line and returns the commands it produced.
    /// Blank and malformed lines produce nothing.
    pub fn handle_line(&mut self, line: &str) -> Vec<SinkCommand> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }

        let envelope = match parse_envelope(line) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("Skipping input line: {}", e);
                self.skipped += 1;
                return Vec::new();
            }
        };

        match envelope.notification.as_str() {
            BACKDROP_REFRESH => {
                self.engine.refresh();
            }
            BACKDROP_PLAYBACK_FAILED => {
                let failure: PlaybackFailure =
                    serde_json::from_value(envelope.payload).unwrap_or_default();
                self.engine.report_playback_failure(&failure.url, &failure.reason);
            }
            name => match WeatherEvent::from_notification(name, &envelope.payload) {
                Ok(event) => {
                    if let Some(event) = event {
                        self.engine.handle(event);
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping notification: {}", e);
                    self.skipped += 1;
                    return self.take_commands();
                }
            },
        }

        self.handled += 1;
        self.take_commands()
    }

    /// Takes commands queued outside of line handling (e.g. the startup scene).
    pub fn take_commands(&mut self) -> Vec<SinkCommand> {
        self.engine.sink_mut().drain()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &BackdropEngine<CommandQueue> {
        &self.engine
    }

    pub fn handled(&self) -> u64 {
        self.handled
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
