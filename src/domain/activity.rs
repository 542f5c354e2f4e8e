//! Conversation and reasoning records: team messages, thinking logs and
//! system log lines.

use serde::{Deserialize, Serialize};

/// Classification the backend assigns to a thinking log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCategory {
    /// The agent did something.
    Action,
    /// The agent reasoned about something.
    Thinking,
    /// The agent expressed an emotion.
    Emotion,
}

/// Emotion attached to a thinking log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionType {
    /// Confusion.
    Confusion,
    /// Satisfaction.
    Satisfaction,
    /// Focus.
    Focus,
    /// Concern.
    Concern,
    /// No particular emotion; also used for unrecognized values.
    #[default]
    #[serde(other)]
    Neutral,
}

/// A message exchanged between agents of a team.
///
/// The backend's team monitor writes the kind under `"type"` while the REST
/// layer uses `"messageType"`; both decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMessage {
    /// Message id, used for de-duplication.
    pub id: String,
    /// Sender agent name.
    pub sender: String,
    /// Recipient agent name; empty for broadcast.
    #[serde(default)]
    pub recipient: String,
    /// Message body.
    pub content: String,
    /// ISO-8601 timestamp as sent by the backend.
    pub timestamp: String,
    /// Kind (`"message"`, `"task"`, `"result"`, `"thinking"`,
    /// `"idle_notification"`, ...).
    #[serde(alias = "type", default)]
    pub message_type: String,
}

impl TeamMessage {
    /// Kind used for idle pings that are not shown in the timeline.
    pub const IDLE_NOTIFICATION: &'static str = "idle_notification";

    /// Returns `true` for idle pings.
    #[must_use]
    pub fn is_idle_notification(&self) -> bool {
        self.message_type == Self::IDLE_NOTIFICATION
    }
}

/// Task context attached to a thinking log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
    /// Task status at the time of the entry.
    pub status: String,
    /// Related task id, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// One entry of an agent's reasoning stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingLog {
    /// Agent that produced the entry.
    pub agent_name: String,
    /// Entry text.
    pub content: String,
    /// ISO-8601 timestamp.
    pub timestamp: String,
    /// Entry classification.
    pub category: MessageCategory,
    /// Emotion, `neutral` unless the category is `emotion`.
    #[serde(default)]
    pub emotion: EmotionType,
    /// Task context, if the entry relates to a task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_details: Option<TaskDetails>,
}

/// Severity of a [`SystemLog`] line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Informational.
    Info,
    /// Something completed.
    Success,
    /// Needs attention.
    Warning,
    /// Failure.
    Error,
}

/// A dashboard system log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLog {
    /// ISO-8601 timestamp, absent for lines the backend emits at connect.
    pub timestamp: Option<String>,
    /// Severity.
    pub level: LogLevel,
    /// Log text.
    pub content: String,
}

impl SystemLog {
    /// Creates a log line stamped with the current time.
    #[must_use]
    pub fn now(level: LogLevel, content: impl Into<String>) -> Self {
        Self {
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            level,
            content: content.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn team_message_accepts_type_alias() {
        let json = r#"{"id":"m1","sender":"a1","recipient":"","content":"hi",
                       "timestamp":"2026-01-01T00:00:00Z","type":"idle_notification"}"#;
        let Ok(msg) = serde_json::from_str::<TeamMessage>(json) else {
            panic!("message must decode");
        };
        assert!(msg.is_idle_notification());
    }

    #[test]
    fn unknown_emotion_is_neutral() {
        let json = r#"{"agentName":"a1","content":"hmm","timestamp":"t",
                       "category":"emotion","emotion":"elation"}"#;
        let Ok(log) = serde_json::from_str::<ThinkingLog>(json) else {
            panic!("thinking log must decode");
        };
        assert_eq!(log.emotion, EmotionType::Neutral);
        assert_eq!(log.category, MessageCategory::Emotion);
    }

    #[test]
    fn system_log_now_is_stamped() {
        let log = SystemLog::now(LogLevel::Success, "connected");
        assert!(log.timestamp.is_some());
        assert_eq!(log.level, LogLevel::Success);
    }
}
