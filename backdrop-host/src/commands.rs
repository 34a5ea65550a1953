//! Line protocol between the host and its surroundings.
//!
//! Input is one JSON envelope per line. Output is one JSON sink command per line.

use backdrop_core::events::NotificationEnvelope;
use backdrop_core::sink::SinkCommand;
use serde::Deserialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Host-level request to re-assert playback of the current scene.
pub const BACKDROP_REFRESH: &str = "BACKDROP_REFRESH";

/// Host-level report that the player failed to play a URL.
pub const BACKDROP_PLAYBACK_FAILED: &str = "BACKDROP_PLAYBACK_FAILED";

/// Payload of [`BACKDROP_PLAYBACK_FAILED`].
#[derive(Debug, Default, Deserialize)]
pub struct PlaybackFailure {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub reason: String,
}

/// Parses one input line into an envelope.
pub fn parse_envelope(line: &str) -> Result<NotificationEnvelope, String> {
    serde_json::from_str(line).map_err(|e| format!("Malformed envelope: {}", e))
}

/// Writes commands as JSON lines and flushes.
pub async fn write_commands<W>(out: &mut W, commands: &[SinkCommand]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if commands.is_empty() {
        return Ok(());
    }
    for command in commands {
        let line = serde_json::to_string(command)?;
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
    }
    out.flush().await
}
