//! Request and response bodies of the backend REST API.
//!
//! List endpoints wrap their payload in a single named field
//! (`{"teams": [...]}`); [`crate::api::ApiClient`] unwraps it.

use serde::{Deserialize, Serialize};

use crate::domain::{HealthEvent, TaskInfo, TeamInfo, TeamMember, TeamMessage, ThinkingLog};

/// `GET /teams`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TeamsResponse {
    pub(crate) teams: Vec<TeamInfo>,
}

/// `GET /teams/{name}/messages`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessagesResponse {
    pub(crate) messages: Vec<TeamMessage>,
}

/// `GET /teams/{name}/tasks`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TasksResponse {
    pub(crate) tasks: Vec<TaskInfo>,
}

/// `GET /teams/{name}/thinking`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ThinkingResponse {
    pub(crate) thinking: Vec<ThinkingLog>,
}

/// Acknowledgement returned by the mutating endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageResponse {
    pub(crate) message: String,
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: Option<String>,
}

/// `POST /teams/{name}/activity` body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ActivityRequest<'a> {
    pub(crate) agent_name: &'a str,
}

/// `GET /teams/{name}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatus {
    /// Team name.
    pub name: String,
    /// Backend-reported status text.
    pub status: String,
    /// Current members.
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

/// `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Whether the health monitor is running.
    pub is_running: bool,
    /// Recent health observations.
    #[serde(default)]
    pub events: Vec<HealthEvent>,
}
