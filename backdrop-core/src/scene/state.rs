//! Scene state machine: decides between a real media swap and a no-op
//! resume when a scene is (re-)requested.

use serde::{Deserialize, Serialize};

use super::key::SceneKey;
use super::resolver::{day_or_night, MediaType, SpriteInfo};
use crate::sink::PlaybackSink;

/// The scene currently showing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneState {
    pub scene: SceneKey,
    pub is_night: bool,
    pub url: String,
    pub media_type: MediaType,
    pub playback_rate: f64,
}

/// A fully resolved scene request, ready for the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRequest {
    pub scene: SceneKey,
    pub is_night: bool,
    pub sprite: Option<SpriteInfo>,
}

/// Outcome of a scene request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// State replaced and new media handed to the sink.
    Changed,
    /// Same scene re-requested; at most a resume was issued.
    Unchanged,
    /// No usable media; previous state kept.
    Rejected,
}

impl Transition {
    pub fn changed(self) -> bool {
        matches!(self, Transition::Changed)
    }
}

/// Holds the single active [`SceneState`]. Starts idle (`current() == None`).
#[derive(Debug, Clone, Default)]
pub struct SceneMachine {
    state: Option<SceneState>,
}

impl SceneMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&SceneState> {
        self.state.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_none()
    }

    /// Applies a scene request.
    ///
    /// Identical requests only ask the sink to resume. Anything else replaces
    /// the state wholesale and loads the new media. Requests without media
    /// are rejected and leave the current scene showing.
    pub fn apply<S: PlaybackSink + ?Sized>(
        &mut self,
        scene: SceneKey,
        is_night: bool,
        sprite: Option<SpriteInfo>,
        sink: &mut S,
    ) -> Transition {
        let Some(sprite) = sprite.filter(|s| !s.url.is_empty()) else {
            tracing::warn!(
                "No media found for scene \"{}\" ({}), keeping current backdrop",
                scene,
                day_or_night(is_night)
            );
            return Transition::Rejected;
        };

        let next = SceneState {
            scene,
            is_night,
            url: sprite.url,
            media_type: sprite.media_type,
            playback_rate: sprite.playback_rate,
        };

        if self.state.as_ref() == Some(&next) {
            tracing::debug!("Scene \"{}\" unchanged, resuming playback only", next.scene);
            sink.resume_if_paused();
            return Transition::Unchanged;
        }

        tracing::info!(
            "Applying scene \"{}\" ({}) -> {}",
            next.scene,
            day_or_night(next.is_night),
            next.url
        );

        match next.media_type {
            MediaType::Video => sink.load_and_play(&next.url, next.playback_rate),
            MediaType::Image => {
                tracing::warn!("Non-video media is not supported, hiding backdrop. Given url: {}", next.url);
                sink.pause_and_hide();
            }
        }

        self.state = Some(next);
        Transition::Changed
    }

    pub fn apply_request<S: PlaybackSink + ?Sized>(
        &mut self,
        request: SceneRequest,
        sink: &mut S,
    ) -> Transition {
        self.apply(request.scene, request.is_night, request.sprite, sink)
    }

    /// Re-asserts playback of the current video without reloading it.
    /// Returns false when idle or when the current media is not playable.
    pub fn resume<S: PlaybackSink + ?Sized>(&self, sink: &mut S) -> bool {
        match &self.state {
            Some(state) if state.media_type == MediaType::Video => {
                sink.resume_if_paused();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{CommandQueue, SinkCommand};

    fn video(url: &str, rate: f64) -> Option<SpriteInfo> {
        Some(SpriteInfo {
            url: url.to_string(),
            media_type: MediaType::Video,
            playback_rate: rate,
        })
    }

    #[test]
    fn test_first_apply_leaves_idle() {
        let mut machine = SceneMachine::new();
        let mut sink = CommandQueue::new();
        assert!(machine.is_idle());

        let t = machine.apply(SceneKey::Rain, false, video("rain.mp4", 1.0), &mut sink);
        assert!(t.changed());
        assert_eq!(machine.current().unwrap().scene, SceneKey::Rain);
        assert_eq!(
            sink.drain(),
            vec![SinkCommand::LoadAndPlay {
                url: "rain.mp4".to_string(),
                playback_rate: 1.0
            }]
        );
    }

    #[test]
    fn test_identical_request_only_resumes() {
        let mut machine = SceneMachine::new();
        let mut sink = CommandQueue::new();
        machine.apply(SceneKey::Rain, true, video("rain.mp4", 1.0), &mut sink);
        sink.drain();

        let t = machine.apply(SceneKey::Rain, true, video("rain.mp4", 1.0), &mut sink);
        assert_eq!(t, Transition::Unchanged);
        assert!(!t.changed());
        assert_eq!(sink.drain(), vec![SinkCommand::ResumeIfPaused]);
    }

    #[test]
    fn test_any_field_difference_reloads() {
        let mut machine = SceneMachine::new();
        let mut sink = CommandQueue::new();
        machine.apply(SceneKey::Rain, false, video("rain.mp4", 1.0), &mut sink);

        assert!(machine.apply(SceneKey::Rain, true, video("rain.mp4", 1.0), &mut sink).changed());
        assert!(machine.apply(SceneKey::Rain, true, video("rain.mp4", 2.0), &mut sink).changed());
        assert!(machine.apply(SceneKey::Sleet, true, video("rain.mp4", 2.0), &mut sink).changed());
        assert!(machine.apply(SceneKey::Sleet, true, video("sleet.mp4", 2.0), &mut sink).changed());
        assert_eq!(sink.len(), 5);
    }

    #[test]
    fn test_missing_media_is_rejected() {
        let mut machine = SceneMachine::new();
        let mut sink = CommandQueue::new();
        machine.apply(SceneKey::Clear, false, video("clear.mp4", 1.0), &mut sink);
        sink.drain();

        assert_eq!(machine.apply(SceneKey::Fog, false, None, &mut sink), Transition::Rejected);
        assert_eq!(
            machine.apply(SceneKey::Fog, false, video("", 1.0), &mut sink),
            Transition::Rejected
        );
        assert_eq!(machine.current().unwrap().scene, SceneKey::Clear);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_rejected_while_idle_stays_idle() {
        let mut machine = SceneMachine::new();
        let mut sink = CommandQueue::new();
        machine.apply(SceneKey::Clear, false, None, &mut sink);
        assert!(machine.is_idle());
        assert!(!machine.resume(&mut sink));
    }

    #[test]
    fn test_image_media_hides() {
        let mut machine = SceneMachine::new();
        let mut sink = CommandQueue::new();
        let image = Some(SpriteInfo {
            url: "still.png".to_string(),
            media_type: MediaType::Image,
            playback_rate: 1.0,
        });
        assert!(machine.apply(SceneKey::manual(), false, image, &mut sink).changed());
        assert_eq!(sink.drain(), vec![SinkCommand::PauseAndHide]);
        assert!(!machine.resume(&mut sink));
    }
}
