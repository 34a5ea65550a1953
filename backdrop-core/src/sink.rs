//! Playback sink boundary.
//!
//! The sink is the surface that actually loads and plays media (a video
//! element, a player process, a remote display). It is fire-and-forget: its
//! own readiness and failure reports never feed back into scene selection.

use serde::{Deserialize, Serialize};

/// Receives playback commands from the scene state machine.
pub trait PlaybackSink {
    /// Discards the current media, then loads and plays `url` looped at `playback_rate`.
    fn load_and_play(&mut self, url: &str, playback_rate: f64);

    /// Resumes playback if the sink is paused. Must not reload.
    fn resume_if_paused(&mut self);

    /// Stops playback and hides the surface.
    fn pause_and_hide(&mut self);
}

/// A playback command as recorded by [`CommandQueue`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SinkCommand {
    LoadAndPlay { url: String, playback_rate: f64 },
    ResumeIfPaused,
    PauseAndHide,
}

/// Sink that queues commands for a host to forward elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    commands: Vec<SinkCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes all queued commands, oldest first.
    pub fn drain(&mut self) -> Vec<SinkCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn commands(&self) -> &[SinkCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl PlaybackSink for CommandQueue {
    fn load_and_play(&mut self, url: &str, playback_rate: f64) {
        self.commands.push(SinkCommand::LoadAndPlay {
            url: url.to_string(),
            playback_rate,
        });
    }

    fn resume_if_paused(&mut self) {
        self.commands.push(SinkCommand::ResumeIfPaused);
    }

    fn pause_and_hide(&mut self) {
        self.commands.push(SinkCommand::PauseAndHide);
    }
}

impl<S: PlaybackSink + ?Sized> PlaybackSink for &mut S {
    fn load_and_play(&mut self, url: &str, playback_rate: f64) {
        (**self).load_and_play(url, playback_rate)
    }

    fn resume_if_paused(&mut self) {
        (**self).resume_if_paused()
    }

    fn pause_and_hide(&mut self) {
        (**self).pause_and_hide()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drain_order() {
        let mut queue = CommandQueue::new();
        queue.load_and_play("a.mp4", 1.0);
        queue.resume_if_paused();
        queue.pause_and_hide();

        assert_eq!(queue.len(), 3);
        let drained = queue.drain();
        assert_eq!(
            drained,
            vec![
                SinkCommand::LoadAndPlay {
                    url: "a.mp4".to_string(),
                    playback_rate: 1.0
                },
                SinkCommand::ResumeIfPaused,
                SinkCommand::PauseAndHide,
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_value(SinkCommand::LoadAndPlay {
            url: "a.mp4".to_string(),
            playback_rate: 0.5,
        })
        .unwrap();
        assert_eq!(json["command"], "load_and_play");
        assert_eq!(json["url"], "a.mp4");
        assert_eq!(
            serde_json::to_value(SinkCommand::ResumeIfPaused).unwrap()["command"],
            "resume_if_paused"
        );
    }
}
