//! Conversation channels between agents.

use serde::{Deserialize, Serialize};

/// A conversation channel. Channels are keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    /// Channel name.
    pub name: String,
    /// Agent ids currently in the channel.
    #[serde(default)]
    pub participants: Vec<String>,
    /// Messages posted so far.
    #[serde(default, alias = "message_count")]
    pub message_count: usize,
}

/// A message posted to a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Synthesized id, see [`ChannelMessage::new`].
    pub id: String,
    /// Channel name.
    pub channel: String,
    /// Sender display name.
    pub sender: String,
    /// Message body.
    pub content: String,
    /// Seconds since the Unix epoch, fractional.
    pub timestamp: f64,
}

impl ChannelMessage {
    /// Builds a message, deriving its id from channel, timestamp and sender
    /// since the backend does not send one.
    #[must_use]
    pub fn new(channel: String, sender: String, content: String, timestamp: f64) -> Self {
        Self {
            id: format!("{channel}-{timestamp}-{sender}"),
            channel,
            sender,
            content,
            timestamp,
        }
    }
}
