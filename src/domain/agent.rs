//! Agent status and health events.

use serde::{Deserialize, Serialize};

/// Runtime status of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Working.
    Running,
    /// Waiting for work.
    Idle,
    /// Process stopped.
    Stopped,
    /// Failed.
    Error,
    /// Not reported or not recognized.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Agent summary pushed in `agents` messages. Agents are keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    /// Agent name.
    pub name: String,
    /// Role within the cluster.
    #[serde(default)]
    pub role: String,
    /// Current status.
    #[serde(default)]
    pub status: AgentStatus,
    /// ISO-8601 time of the last observed activity.
    #[serde(default)]
    pub last_activity: Option<String>,
    /// Number of tasks assigned.
    #[serde(default)]
    pub task_count: u32,
}

/// A health-monitor observation about one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEvent {
    /// Agent observed.
    pub agent_name: String,
    /// Team the agent belongs to.
    pub team_name: String,
    /// Reported status; `"error"` flags the dashboard.
    pub status: String,
    /// ISO-8601 timestamp.
    pub timestamp: String,
    /// Extra monitor-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Map<String, serde_json::Value>>,
}

impl HealthEvent {
    /// Returns `true` when the event reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}
