//! WebSocket message types: raw envelope, server messages, client commands.
//!
//! Frames are flat JSON objects discriminated by a `"type"` field. The
//! transport dispatches on that string alone ([`Envelope`]); consumers
//! decode the envelope into the closed [`ServerMessage`] union.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    AgentInfo, ChannelInfo, HealthEvent, LogLevel, TaskInfo, TeamInfo, TeamMessage, ThinkingLog,
};
use crate::error::MonitorError;

/// A parsed inbound frame: its `type` plus the whole JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Value of the `type` field.
    pub kind: String,
    /// The full frame, `type` included.
    pub payload: Value,
}

impl Envelope {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Serialization`] for invalid JSON and
    /// [`MonitorError::InvalidFrame`] when the frame is not an object with
    /// a string `type`.
    pub fn parse(text: &str) -> Result<Self, MonitorError> {
        let payload: Value = serde_json::from_str(text)?;
        let kind = payload
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| MonitorError::InvalidFrame("missing string `type` field".to_string()))?
            .to_string();
        Ok(Self { kind, payload })
    }

    /// Decodes the frame into a typed [`ServerMessage`].
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::UnknownMessage`] for a `type` outside
    /// [`ServerMessage::KINDS`], or [`MonitorError::Serialization`] when a
    /// known kind carries a malformed body.
    pub fn decode(&self) -> Result<ServerMessage, MonitorError> {
        if !ServerMessage::KINDS.iter().any(|k| *k == self.kind) {
            return Err(MonitorError::UnknownMessage(self.kind.clone()));
        }
        Ok(ServerMessage::deserialize(&self.payload)?)
    }

    /// Reads a field of the frame.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }
}

/// Body shared by the agent-to-agent message kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    /// ISO-8601 timestamp.
    pub timestamp: String,
    /// Sending agent.
    #[serde(default)]
    pub from_agent: Option<String>,
    /// Receiving agent.
    #[serde(default)]
    pub to_agent: Option<String>,
    /// Message body.
    pub content: String,
}

/// Every message kind the backend pushes over `/ws`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection acknowledgement, sent once per socket.
    Connected {
        /// Greeting text.
        message: String,
    },
    /// Acknowledges a `subscribe` command.
    Subscribed {
        /// Channels now subscribed.
        #[serde(default)]
        channels: Vec<String>,
    },
    /// Acknowledges an `unsubscribe` command.
    Unsubscribed {
        /// Channels removed.
        #[serde(default)]
        channels: Vec<String>,
    },
    /// Heartbeat reply echoing the ping timestamp.
    Pong {
        /// Echoed timestamp in Unix milliseconds.
        #[serde(default)]
        timestamp: Option<i64>,
    },
    /// Status snapshot, either per agent or server-wide.
    Status {
        /// Agent the status refers to.
        #[serde(default)]
        agent: Option<String>,
        /// Status text.
        #[serde(default)]
        status: Option<String>,
        /// Server-wide data (e.g. connection count).
        #[serde(default)]
        data: Option<Value>,
    },
    /// Plain agent message.
    #[serde(rename = "message")]
    AgentMessage(AgentMessage),
    /// Task handed from one agent to another.
    #[serde(rename = "task")]
    AgentTask(AgentMessage),
    /// Result reported back.
    #[serde(rename = "result")]
    AgentResult(AgentMessage),
    /// Agent went idle.
    IdleNotification(AgentMessage),
    /// Raw thinking line from an agent.
    Thinking {
        /// ISO-8601 timestamp.
        timestamp: String,
        /// Agent name.
        agent: String,
        /// Thinking text.
        content: String,
    },
    /// Agent roster snapshot.
    Agents {
        /// Agents.
        agents: Vec<AgentInfo>,
        /// Cluster name, if reported.
        #[serde(default, rename = "clusterName")]
        cluster_name: Option<String>,
    },
    /// Server-side error report.
    Error {
        /// Error text.
        message: String,
    },
    /// Dashboard log line.
    SystemLog {
        /// ISO-8601 timestamp.
        #[serde(default)]
        timestamp: Option<String>,
        /// Severity.
        level: LogLevel,
        /// Log text.
        content: String,
    },
    /// Cluster lifecycle event.
    ClusterEvent {
        /// Event name.
        event: String,
        /// Event data.
        #[serde(default)]
        data: Option<Map<String, Value>>,
    },
    /// Full team list, sent right after connect.
    Teams {
        /// Teams.
        teams: Vec<TeamInfo>,
    },
    /// A team appeared.
    TeamCreated {
        /// Team name.
        #[serde(rename = "teamName")]
        team_name: String,
        /// Team data.
        team: TeamInfo,
    },
    /// A team was removed.
    TeamDeleted {
        /// Team name.
        #[serde(rename = "teamName")]
        team_name: String,
    },
    /// A team changed.
    TeamUpdated {
        /// Team name.
        #[serde(rename = "teamName")]
        team_name: String,
        /// New team data.
        team: TeamInfo,
    },
    /// A message was exchanged inside a team.
    TeamMessage {
        /// Team name.
        #[serde(rename = "teamName")]
        team_name: String,
        /// The message.
        message: TeamMessage,
    },
    /// A thinking log entry for a team.
    ThinkingLog {
        /// Team name.
        #[serde(rename = "teamName")]
        team_name: String,
        /// The entry.
        log: ThinkingLog,
    },
    /// The full task list of a team changed.
    TasksUpdated {
        /// Team name.
        #[serde(rename = "teamName")]
        team_name: String,
        /// Current tasks.
        tasks: Vec<TaskInfo>,
    },
    /// Health monitor observation.
    HealthEvent {
        /// The observation.
        event: HealthEvent,
    },
    /// A message posted to a conversation channel.
    ChannelMessage {
        /// Channel name.
        channel: String,
        /// Sender display name.
        sender: String,
        /// Sender agent id.
        #[serde(default)]
        sender_id: Option<String>,
        /// Body.
        content: String,
        /// Seconds since the Unix epoch.
        timestamp: f64,
    },
    /// This client joined a channel.
    ChannelJoined {
        /// Channel name.
        channel: String,
        /// Current participants.
        #[serde(default)]
        participants: Vec<String>,
    },
    /// This client left a channel.
    ChannelLeft {
        /// Channel name.
        channel: String,
    },
    /// Channel catalogue.
    ChannelsList {
        /// Channels.
        channels: Vec<ChannelInfo>,
    },
    /// Another agent joined a channel.
    ParticipantJoined {
        /// Channel name.
        channel: String,
        /// Agent id.
        agent_id: String,
    },
    /// Another agent left a channel.
    ParticipantLeft {
        /// Channel name.
        channel: String,
        /// Agent id.
        agent_id: String,
    },
}

impl ServerMessage {
    /// Every `type` string this union decodes.
    pub const KINDS: [&'static str; 28] = [
        "connected",
        "subscribed",
        "unsubscribed",
        "pong",
        "status",
        "message",
        "task",
        "result",
        "idle_notification",
        "thinking",
        "agents",
        "error",
        "system_log",
        "cluster_event",
        "teams",
        "team_created",
        "team_deleted",
        "team_updated",
        "team_message",
        "thinking_log",
        "tasks_updated",
        "health_event",
        "channel_message",
        "channel_joined",
        "channel_left",
        "channels_list",
        "participant_joined",
        "participant_left",
    ];

    /// Returns the wire `type` of this message.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::Subscribed { .. } => "subscribed",
            Self::Unsubscribed { .. } => "unsubscribed",
            Self::Pong { .. } => "pong",
            Self::Status { .. } => "status",
            Self::AgentMessage(_) => "message",
            Self::AgentTask(_) => "task",
            Self::AgentResult(_) => "result",
            Self::IdleNotification(_) => "idle_notification",
            Self::Thinking { .. } => "thinking",
            Self::Agents { .. } => "agents",
            Self::Error { .. } => "error",
            Self::SystemLog { .. } => "system_log",
            Self::ClusterEvent { .. } => "cluster_event",
            Self::Teams { .. } => "teams",
            Self::TeamCreated { .. } => "team_created",
            Self::TeamDeleted { .. } => "team_deleted",
            Self::TeamUpdated { .. } => "team_updated",
            Self::TeamMessage { .. } => "team_message",
            Self::ThinkingLog { .. } => "thinking_log",
            Self::TasksUpdated { .. } => "tasks_updated",
            Self::HealthEvent { .. } => "health_event",
            Self::ChannelMessage { .. } => "channel_message",
            Self::ChannelJoined { .. } => "channel_joined",
            Self::ChannelLeft { .. } => "channel_left",
            Self::ChannelsList { .. } => "channels_list",
            Self::ParticipantJoined { .. } => "participant_joined",
            Self::ParticipantLeft { .. } => "participant_left",
        }
    }
}

/// Commands a client can send over `/ws`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to event channels.
    Subscribe {
        /// Channel names.
        channels: Vec<String>,
    },
    /// Unsubscribe from event channels.
    Unsubscribe {
        /// Channel names.
        channels: Vec<String>,
    },
    /// Heartbeat request.
    Ping {
        /// Unix milliseconds at send time.
        timestamp: i64,
    },
    /// Ask for a server status snapshot.
    GetStatus,
    /// Ask for the team list.
    GetTeams,
    /// Join a conversation channel.
    JoinChannel {
        /// Channel name.
        channel: String,
    },
    /// Leave a conversation channel.
    LeaveChannel {
        /// Channel name.
        channel: String,
    },
    /// Post a message from the operator.
    Message {
        /// Message body.
        content: String,
        /// ISO-8601 timestamp.
        timestamp: String,
    },
}

impl ClientMessage {
    /// A ping stamped with the current time.
    #[must_use]
    pub fn ping_now() -> Self {
        Self::Ping {
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// An operator message stamped with the current time.
    #[must_use]
    pub fn message(content: impl Into<String>) -> Self {
        Self::Message {
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Returns the wire `type` of this command.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Subscribe { .. } => "subscribe",
            Self::Unsubscribe { .. } => "unsubscribe",
            Self::Ping { .. } => "ping",
            Self::GetStatus => "get_status",
            Self::GetTeams => "get_teams",
            Self::JoinChannel { .. } => "join_channel",
            Self::LeaveChannel { .. } => "leave_channel",
            Self::Message { .. } => "message",
        }
    }
}
