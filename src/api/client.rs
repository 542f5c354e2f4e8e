//! HTTP client for the backend REST API.

use std::time::Duration;

use reqwest::{Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::dto::{
    ActivityRequest, ErrorBody, HealthStatus, MessageResponse, MessagesResponse, TasksResponse,
    TeamStatus, TeamsResponse, ThinkingResponse,
};
use crate::domain::{TaskInfo, TeamInfo, TeamMessage, ThinkingLog};
use crate::error::MonitorError;

/// Typed client over `reqwest`. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Creates a client for `base_url` (e.g. `http://127.0.0.1:8000/api`).
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidUrl`] if `base_url` is not an
    /// absolute `http(s)` URL, or [`MonitorError::Http`] if the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MonitorError> {
        let base = Url::parse(base_url).map_err(|e| MonitorError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(MonitorError::InvalidUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme `{}`", base.scheme()),
            });
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    /// The base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends path segments to the base URL. Segments are
    /// percent-encoded, so team names may contain `/` or spaces.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MonitorError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| MonitorError::InvalidUrl {
                url: self.base.to_string(),
                reason: "base url cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, MonitorError> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    async fn post<T, B>(&self, url: Url, body: Option<&B>) -> Result<T, MonitorError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!(%url, "POST");
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        decode(request.send().await?).await
    }

    async fn post_empty(&self, url: Url) -> Result<String, MonitorError> {
        let ack: MessageResponse = self.post::<_, ()>(url, None).await?;
        Ok(ack.message)
    }

    /// `GET /teams`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Api`] on a non-success status,
    /// [`MonitorError::Http`] on transport failure, or
    /// [`MonitorError::Serialization`] on an unexpected body.
    pub async fn get_teams(&self) -> Result<Vec<TeamInfo>, MonitorError> {
        let body: TeamsResponse = self.get(self.endpoint(&["teams"])?).await?;
        Ok(body.teams)
    }

    /// `GET /teams/{team}/messages`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_teams`].
    pub async fn get_team_messages(&self, team: &str) -> Result<Vec<TeamMessage>, MonitorError> {
        let body: MessagesResponse = self
            .get(self.endpoint(&["teams", team, "messages"])?)
            .await?;
        Ok(body.messages)
    }

    /// `GET /teams/{team}/tasks`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_teams`].
    pub async fn get_team_tasks(&self, team: &str) -> Result<Vec<TaskInfo>, MonitorError> {
        let body: TasksResponse = self.get(self.endpoint(&["teams", team, "tasks"])?).await?;
        Ok(body.tasks)
    }

    /// `GET /teams/{team}/thinking`, optionally narrowed to one agent.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_teams`].
    pub async fn get_team_thinking(
        &self,
        team: &str,
        agent: Option<&str>,
    ) -> Result<Vec<ThinkingLog>, MonitorError> {
        let mut url = self.endpoint(&["teams", team, "thinking"])?;
        if let Some(agent) = agent.filter(|a| !a.is_empty()) {
            url.query_pairs_mut().append_pair("agent", agent);
        }
        let body: ThinkingResponse = self.get(url).await?;
        Ok(body.thinking)
    }

    /// `GET /teams/{team}/status`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_teams`].
    pub async fn get_team_status(&self, team: &str) -> Result<TeamStatus, MonitorError> {
        self.get(self.endpoint(&["teams", team, "status"])?).await
    }

    /// `POST /teams/{team}/activity`: marks `agent` as active. Returns the
    /// backend's acknowledgement text.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_teams`].
    pub async fn update_agent_activity(
        &self,
        team: &str,
        agent: &str,
    ) -> Result<String, MonitorError> {
        let url = self.endpoint(&["teams", team, "activity"])?;
        let ack: MessageResponse = self
            .post(url, Some(&ActivityRequest { agent_name: agent }))
            .await?;
        Ok(ack.message)
    }

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_teams`].
    pub async fn get_health_status(&self) -> Result<HealthStatus, MonitorError> {
        self.get(self.endpoint(&["health"])?).await
    }

    /// `POST /health/start`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_teams`].
    pub async fn start_health_monitoring(&self) -> Result<String, MonitorError> {
        self.post_empty(self.endpoint(&["health", "start"])?).await
    }

    /// `POST /health/stop`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_teams`].
    pub async fn stop_health_monitoring(&self) -> Result<String, MonitorError> {
        self.post_empty(self.endpoint(&["health", "stop"])?).await
    }

    /// `POST /teams/monitoring/start`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_teams`].
    pub async fn start_teams_monitoring(&self) -> Result<String, MonitorError> {
        self.post_empty(self.endpoint(&["teams", "monitoring", "start"])?)
            .await
    }

    /// `POST /teams/monitoring/stop`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_teams`].
    pub async fn stop_teams_monitoring(&self) -> Result<String, MonitorError> {
        self.post_empty(self.endpoint(&["teams", "monitoring", "stop"])?)
            .await
    }
}

/// Maps a response to `T`, or to [`MonitorError::Api`] on a non-2xx
/// status.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, MonitorError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status.to_string());
        tracing::warn!(%status, %message, "api request failed");
        return Err(MonitorError::Api { status, message });
    }
    Ok(serde_json::from_slice(&bytes)?)
}
