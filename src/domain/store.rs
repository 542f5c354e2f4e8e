//! In-memory dashboard state.
//!
//! [`DashboardStore`] is the projection the realtime stream and the REST
//! hydration calls write into. Collections are keyed the way the backend
//! keys them (teams and agents by name, messages by id, tasks by task id,
//! channels by name) and de-duplicated on insert. Message, thinking log
//! and system log buffers are bounded; the oldest entries are evicted.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use super::{
    AgentInfo, ChannelInfo, ChannelMessage, LogLevel, SystemLog, TaskInfo, TaskStats, TaskUpdate,
    TeamInfo, TeamMessage, ThinkingLog,
};
use crate::ws::ServerMessage;

/// Team messages kept in memory.
pub const MESSAGE_BUFFER_SIZE: usize = 1000;

/// Thinking log entries kept in memory.
pub const MAX_THINKING_LOGS: usize = 500;

/// System log lines kept in memory.
pub const MAX_SYSTEM_LOGS: usize = 500;

/// Message counters since the last reset, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageCounts {
    /// Every accepted message.
    pub total: usize,
    /// Messages of kind `thinking`.
    pub thinking: usize,
    /// Messages of kind `task`.
    pub task: usize,
    /// Messages of kind `result`.
    pub result: usize,
}

impl MessageCounts {
    fn record(&mut self, message: &TeamMessage) {
        self.total += 1;
        match message.message_type.as_str() {
            "thinking" => self.thinking += 1,
            "task" => self.task += 1,
            "result" => self.result += 1,
            _ => {}
        }
    }

    fn from_messages(messages: &[TeamMessage]) -> Self {
        let mut counts = Self::default();
        for m in messages {
            counts.record(m);
        }
        counts
    }
}

/// Point-in-time copy of the whole dashboard state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Known teams.
    pub teams: Vec<TeamInfo>,
    /// Team currently in focus.
    pub selected_team: Option<String>,
    /// Known agents.
    pub agents: Vec<AgentInfo>,
    /// Most recent team messages.
    pub messages: Vec<TeamMessage>,
    /// Message counters.
    pub message_counts: MessageCounts,
    /// Task board of the selected team.
    pub tasks: Vec<TaskInfo>,
    /// Task counts by status.
    pub task_stats: TaskStats,
    /// Most recent thinking log entries.
    pub thinking_logs: Vec<ThinkingLog>,
    /// Most recent system log lines.
    pub system_logs: Vec<SystemLog>,
    /// Whether an error was reported by logs or the health monitor.
    pub has_errors: bool,
    /// Known conversation channels.
    pub channels: Vec<ChannelInfo>,
    /// Channel currently in focus.
    pub current_channel: Option<String>,
    /// Messages per channel.
    pub channel_messages: HashMap<String, Vec<ChannelMessage>>,
}

/// Thread-safe dashboard state shared by every consumer.
#[derive(Debug, Default)]
pub struct DashboardStore {
    state: RwLock<DashboardSnapshot>,
}

fn push_bounded<T>(buf: &mut Vec<T>, item: T, cap: usize) {
    buf.push(item);
    if buf.len() > cap {
        let excess = buf.len() - cap;
        buf.drain(..excess);
    }
}

impl DashboardStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, DashboardSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DashboardSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clones the current state.
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.read().clone()
    }

    /// Name of the selected team.
    #[must_use]
    pub fn selected_team(&self) -> Option<String> {
        self.read().selected_team.clone()
    }

    /// Message counters.
    #[must_use]
    pub fn message_counts(&self) -> MessageCounts {
        self.read().message_counts
    }

    /// Task counts by status.
    #[must_use]
    pub fn task_stats(&self) -> TaskStats {
        self.read().task_stats
    }

    /// Whether an error has been reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.read().has_errors
    }

    // -- teams ---------------------------------------------------------

    /// Replaces the team list.
    pub fn set_teams(&self, teams: Vec<TeamInfo>) {
        self.write().teams = teams;
    }

    /// Inserts a team, replacing one with the same name.
    pub fn add_team(&self, team: TeamInfo) {
        let mut state = self.write();
        match state.teams.iter_mut().find(|t| t.name == team.name) {
            Some(existing) => *existing = team,
            None => state.teams.push(team),
        }
    }

    /// Removes a team and clears the selection if it was selected.
    pub fn remove_team(&self, team_name: &str) {
        let mut state = self.write();
        state.teams.retain(|t| t.name != team_name);
        if state.selected_team.as_deref() == Some(team_name) {
            state.selected_team = None;
        }
    }

    /// Replaces the team called `team_name`. Unknown names are ignored.
    pub fn update_team(&self, team_name: &str, team: TeamInfo) {
        let mut state = self.write();
        if let Some(existing) = state.teams.iter_mut().find(|t| t.name == team_name) {
            *existing = team;
        }
    }

    /// Changes the selected team. When the selection actually changes the
    /// per-team buffers (messages, counters, thinking logs) are cleared and
    /// `true` is returned.
    pub fn select_team(&self, team_name: Option<String>) -> bool {
        let mut state = self.write();
        if state.selected_team == team_name {
            return false;
        }
        state.selected_team = team_name;
        state.messages.clear();
        state.message_counts = MessageCounts::default();
        state.thinking_logs.clear();
        true
    }

    // -- agents --------------------------------------------------------

    /// Replaces the agent list.
    pub fn set_agents(&self, agents: Vec<AgentInfo>) {
        self.write().agents = agents;
    }

    /// Inserts an agent, replacing one with the same name.
    pub fn upsert_agent(&self, agent: AgentInfo) {
        let mut state = self.write();
        match state.agents.iter_mut().find(|a| a.name == agent.name) {
            Some(existing) => *existing = agent,
            None => state.agents.push(agent),
        }
    }

    /// Removes an agent by name.
    pub fn remove_agent(&self, agent_name: &str) {
        self.write().agents.retain(|a| a.name != agent_name);
    }

    // -- messages ------------------------------------------------------

    /// Appends a message unless one with the same id is present. Returns
    /// `true` if it was added.
    pub fn add_message(&self, message: TeamMessage) -> bool {
        let mut state = self.write();
        if state.messages.iter().any(|m| m.id == message.id) {
            return false;
        }
        state.message_counts.record(&message);
        push_bounded(&mut state.messages, message, MESSAGE_BUFFER_SIZE);
        true
    }

    /// Appends the messages whose ids are new. Returns how many were added.
    pub fn add_messages(&self, messages: Vec<TeamMessage>) -> usize {
        let mut state = self.write();
        let mut added = 0;
        for message in messages {
            if state.messages.iter().any(|m| m.id == message.id) {
                continue;
            }
            state.message_counts.record(&message);
            push_bounded(&mut state.messages, message, MESSAGE_BUFFER_SIZE);
            added += 1;
        }
        added
    }

    /// Overwrites messages and counters, e.g. with a fresh REST fetch.
    pub fn replace_messages(&self, mut messages: Vec<TeamMessage>) {
        let mut state = self.write();
        state.message_counts = MessageCounts::from_messages(&messages);
        if messages.len() > MESSAGE_BUFFER_SIZE {
            let excess = messages.len() - MESSAGE_BUFFER_SIZE;
            messages.drain(..excess);
        }
        state.messages = messages;
    }

    /// Drops all messages and counters.
    pub fn clear_messages(&self) {
        let mut state = self.write();
        state.messages.clear();
        state.message_counts = MessageCounts::default();
    }

    // -- tasks ---------------------------------------------------------

    /// Replaces the task board.
    pub fn set_tasks(&self, tasks: Vec<TaskInfo>) {
        let mut state = self.write();
        state.task_stats = TaskStats::from_tasks(&tasks);
        state.tasks = tasks;
    }

    /// Applies a partial update to one task. Returns `false` if the task is
    /// unknown.
    pub fn update_task(&self, task_id: &str, update: &TaskUpdate) -> bool {
        let mut state = self.write();
        let Some(task) = state.tasks.iter_mut().find(|t| t.task_id == task_id) else {
            return false;
        };
        task.apply(update);
        state.task_stats = TaskStats::from_tasks(&state.tasks);
        true
    }

    /// Appends a task.
    pub fn add_task(&self, task: TaskInfo) {
        let mut state = self.write();
        state.tasks.push(task);
        state.task_stats = TaskStats::from_tasks(&state.tasks);
    }

    // -- logs ----------------------------------------------------------

    /// Appends a thinking log entry.
    pub fn add_thinking_log(&self, log: ThinkingLog) {
        push_bounded(&mut self.write().thinking_logs, log, MAX_THINKING_LOGS);
    }

    /// Drops all thinking log entries.
    pub fn clear_thinking_logs(&self) {
        self.write().thinking_logs.clear();
    }

    /// Appends a system log line; the error flag follows the buffer.
    pub fn add_system_log(&self, log: SystemLog) {
        let mut state = self.write();
        push_bounded(&mut state.system_logs, log, MAX_SYSTEM_LOGS);
        state.has_errors = state.system_logs.iter().any(|l| l.level == LogLevel::Error);
    }

    /// Drops all system log lines and the error flag.
    pub fn clear_system_logs(&self) {
        let mut state = self.write();
        state.system_logs.clear();
        state.has_errors = false;
    }

    /// Sets the error flag directly (health monitor).
    pub fn set_has_errors(&self, has_errors: bool) {
        self.write().has_errors = has_errors;
    }

    // -- channels ------------------------------------------------------

    /// Replaces the channel list.
    pub fn set_channels(&self, channels: Vec<ChannelInfo>) {
        self.write().channels = channels;
    }

    /// Inserts a channel, replacing one with the same name.
    pub fn add_channel(&self, channel: ChannelInfo) {
        let mut state = self.write();
        match state.channels.iter_mut().find(|c| c.name == channel.name) {
            Some(existing) => *existing = channel,
            None => state.channels.push(channel),
        }
    }

    /// Removes a channel, its messages, and the focus if it had it.
    pub fn remove_channel(&self, channel_name: &str) {
        let mut state = self.write();
        state.channels.retain(|c| c.name != channel_name);
        state.channel_messages.remove(channel_name);
        if state.current_channel.as_deref() == Some(channel_name) {
            state.current_channel = None;
        }
    }

    /// Changes the focused channel.
    pub fn set_current_channel(&self, channel_name: Option<String>) {
        self.write().current_channel = channel_name;
    }

    /// Appends a channel message unless its id is already present. The
    /// channel's message count follows the stored list. Returns `true` if
    /// it was added.
    pub fn add_channel_message(&self, message: ChannelMessage) -> bool {
        let mut state = self.write();
        let channel = message.channel.clone();
        let list = state.channel_messages.entry(channel.clone()).or_default();
        if list.iter().any(|m| m.id == message.id) {
            return false;
        }
        list.push(message);
        let count = list.len();
        if let Some(info) = state.channels.iter_mut().find(|c| c.name == channel) {
            info.message_count = count;
        }
        true
    }

    /// Messages of one channel, oldest first.
    #[must_use]
    pub fn channel_messages(&self, channel_name: &str) -> Vec<ChannelMessage> {
        self.read()
            .channel_messages
            .get(channel_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Clears everything.
    pub fn reset(&self) {
        *self.write() = DashboardSnapshot::default();
    }

    // -- stream --------------------------------------------------------

    /// Routes one realtime message into the store. Returns `false` for
    /// kinds the dashboard does not project.
    pub fn apply(&self, message: &ServerMessage) -> bool {
        match message {
            ServerMessage::Teams { teams } => self.set_teams(teams.clone()),
            ServerMessage::TeamCreated { team_name, team } => {
                self.add_team(team.clone());
                self.add_system_log(SystemLog::now(
                    LogLevel::Success,
                    format!("team created: {team_name}"),
                ));
            }
            ServerMessage::TeamDeleted { team_name } => {
                self.remove_team(team_name);
                self.add_system_log(SystemLog::now(
                    LogLevel::Warning,
                    format!("team deleted: {team_name}"),
                ));
            }
            ServerMessage::TeamUpdated { team_name, team } => {
                self.update_team(team_name, team.clone());
            }
            ServerMessage::TeamMessage { message, .. } => {
                if !message.is_idle_notification() {
                    self.add_message(message.clone());
                }
            }
            ServerMessage::ThinkingLog { log, .. } => self.add_thinking_log(log.clone()),
            ServerMessage::TasksUpdated { tasks, .. } => self.set_tasks(tasks.clone()),
            ServerMessage::SystemLog {
                timestamp,
                level,
                content,
            } => self.add_system_log(SystemLog {
                timestamp: timestamp.clone(),
                level: *level,
                content: content.clone(),
            }),
            ServerMessage::HealthEvent { event } => self.set_has_errors(event.is_error()),
            ServerMessage::Agents { agents, .. } => {
                for agent in agents {
                    self.upsert_agent(agent.clone());
                }
            }
            ServerMessage::ChannelMessage {
                channel,
                sender,
                content,
                timestamp,
                ..
            } => {
                self.add_channel_message(ChannelMessage::new(
                    channel.clone(),
                    sender.clone(),
                    content.clone(),
                    *timestamp,
                ));
            }
            ServerMessage::ChannelJoined {
                channel,
                participants,
            } => {
                self.add_channel(ChannelInfo {
                    name: channel.clone(),
                    participants: participants.clone(),
                    message_count: 0,
                });
                self.add_system_log(SystemLog::now(
                    LogLevel::Success,
                    format!("joined channel {channel}"),
                ));
            }
            ServerMessage::ChannelLeft { channel } => {
                self.add_system_log(SystemLog::now(
                    LogLevel::Info,
                    format!("left channel {channel}"),
                ));
            }
            ServerMessage::ChannelsList { channels } => self.set_channels(channels.clone()),
            ServerMessage::ParticipantJoined { channel, agent_id } => {
                self.add_system_log(SystemLog::now(
                    LogLevel::Info,
                    format!("{agent_id} joined channel {channel}"),
                ));
            }
            ServerMessage::ParticipantLeft { channel, agent_id } => {
                self.add_system_log(SystemLog::now(
                    LogLevel::Info,
                    format!("{agent_id} left channel {channel}"),
                ));
            }
            _ => return false,
        }
        true
    }
}

/// Kinds [`DashboardStore::apply`] projects.
pub const PROJECTED_KINDS: [&str; 16] = [
    "teams",
    "team_created",
    "team_deleted",
    "team_updated",
    "team_message",
    "thinking_log",
    "tasks_updated",
    "system_log",
    "health_event",
    "agents",
    "channel_message",
    "channel_joined",
    "channel_left",
    "channels_list",
    "participant_joined",
    "participant_left",
];

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AgentStatus, HealthEvent, MessageCategory, EmotionType, TaskStatus};

    fn message(id: &str, kind: &str) -> TeamMessage {
        TeamMessage {
            id: id.to_string(),
            sender: "a1".to_string(),
            recipient: String::new(),
            content: format!("body {id}"),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            message_type: kind.to_string(),
        }
    }

    fn team(name: &str, description: &str) -> TeamInfo {
        TeamInfo {
            name: name.to_string(),
            description: description.to_string(),
            created_at: 0,
            lead_agent_id: String::new(),
            lead_session_id: String::new(),
            members: Vec::new(),
        }
    }

    fn task(id: &str, status: TaskStatus) -> TaskInfo {
        TaskInfo {
            task_id: id.to_string(),
            subject: id.to_string(),
            description: String::new(),
            status,
            owner: String::new(),
            blocked_by: None,
            blocks: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn thinking(n: usize) -> ThinkingLog {
        ThinkingLog {
            agent_name: "a1".to_string(),
            content: format!("thought {n}"),
            timestamp: String::new(),
            category: MessageCategory::Thinking,
            emotion: EmotionType::Neutral,
            task_details: None,
        }
    }

    #[test]
    fn add_message_dedupes_and_counts() {
        let store = DashboardStore::new();
        assert!(store.add_message(message("m1", "task")));
        assert!(!store.add_message(message("m1", "task")));
        assert!(store.add_message(message("m2", "result")));

        let counts = store.message_counts();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.task, 1);
        assert_eq!(counts.result, 1);
        assert_eq!(counts.thinking, 0);
    }

    #[test]
    fn add_messages_skips_known_ids() {
        let store = DashboardStore::new();
        store.add_message(message("m1", "message"));
        let added = store.add_messages(vec![
            message("m1", "message"),
            message("m2", "thinking"),
            message("m2", "thinking"),
        ]);
        assert_eq!(added, 1);
        assert_eq!(store.snapshot().messages.len(), 2);
        assert_eq!(store.message_counts().thinking, 1);
    }

    #[test]
    fn message_buffer_is_bounded() {
        let store = DashboardStore::new();
        for i in 0..(MESSAGE_BUFFER_SIZE + 5) {
            store.add_message(message(&format!("m{i}"), "message"));
        }
        let snapshot = store.snapshot();
        assert_eq!(snapshot.messages.len(), MESSAGE_BUFFER_SIZE);
        assert_eq!(snapshot.messages.first().map(|m| m.id.as_str()), Some("m5"));
        assert_eq!(snapshot.message_counts.total, MESSAGE_BUFFER_SIZE + 5);
    }

    #[test]
    fn thinking_log_buffer_is_bounded() {
        let store = DashboardStore::new();
        for i in 0..(MAX_THINKING_LOGS + 1) {
            store.add_thinking_log(thinking(i));
        }
        let logs = store.snapshot().thinking_logs;
        assert_eq!(logs.len(), MAX_THINKING_LOGS);
        assert_eq!(logs.first().map(|l| l.content.as_str()), Some("thought 1"));
    }

    #[test]
    fn replace_messages_recounts() {
        let store = DashboardStore::new();
        store.add_message(message("old", "task"));
        store.replace_messages(vec![message("n1", "thinking"), message("n2", "thinking")]);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.message_counts.thinking, 2);
        assert_eq!(snapshot.message_counts.task, 0);
    }

    #[test]
    fn teams_upsert_update_remove() {
        let store = DashboardStore::new();
        store.add_team(team("alpha", "v1"));
        store.add_team(team("alpha", "v2"));
        store.add_team(team("beta", "v1"));
        store.update_team("beta", team("beta", "v9"));
        store.update_team("ghost", team("ghost", "x"));

        let teams = store.snapshot().teams;
        assert_eq!(teams.len(), 2);
        assert_eq!(teams.first().map(|t| t.description.as_str()), Some("v2"));
        assert_eq!(teams.get(1).map(|t| t.description.as_str()), Some("v9"));

        store.select_team(Some("alpha".to_string()));
        store.remove_team("alpha");
        assert!(store.selected_team().is_none());
    }

    #[test]
    fn selecting_new_team_clears_team_buffers() {
        let store = DashboardStore::new();
        store.add_message(message("m1", "task"));
        store.add_thinking_log(thinking(1));

        assert!(store.select_team(Some("alpha".to_string())));
        let snapshot = store.snapshot();
        assert!(snapshot.messages.is_empty());
        assert!(snapshot.thinking_logs.is_empty());
        assert_eq!(snapshot.message_counts, MessageCounts::default());

        store.add_message(message("m2", "task"));
        assert!(!store.select_team(Some("alpha".to_string())));
        assert_eq!(store.snapshot().messages.len(), 1);
    }

    #[test]
    fn tasks_keep_stats_current() {
        let store = DashboardStore::new();
        store.set_tasks(vec![task("1", TaskStatus::Pending), task("2", TaskStatus::Pending)]);
        assert_eq!(store.task_stats().pending, 2);

        assert!(store.update_task(
            "1",
            &TaskUpdate {
                status: Some(TaskStatus::Completed),
                ..TaskUpdate::default()
            }
        ));
        assert!(!store.update_task("nope", &TaskUpdate::default()));
        store.add_task(task("3", TaskStatus::InProgress));

        let stats = store.task_stats();
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.total, 3);
    }

    #[test]
    fn system_logs_drive_error_flag() {
        let store = DashboardStore::new();
        store.add_system_log(SystemLog::now(LogLevel::Info, "hello"));
        assert!(!store.has_errors());
        store.add_system_log(SystemLog::now(LogLevel::Error, "boom"));
        assert!(store.has_errors());
        store.clear_system_logs();
        assert!(!store.has_errors());
    }

    #[test]
    fn channel_messages_dedupe_and_count() {
        let store = DashboardStore::new();
        store.add_channel(ChannelInfo {
            name: "general".to_string(),
            participants: vec!["a1".to_string()],
            message_count: 0,
        });
        let msg = ChannelMessage::new("general".into(), "a1".into(), "hi".into(), 10.0);
        assert!(store.add_channel_message(msg.clone()));
        assert!(!store.add_channel_message(msg));

        assert_eq!(store.channel_messages("general").len(), 1);
        assert_eq!(
            store.snapshot().channels.first().map(|c| c.message_count),
            Some(1)
        );

        store.set_current_channel(Some("general".to_string()));
        store.remove_channel("general");
        let snapshot = store.snapshot();
        assert!(snapshot.channels.is_empty());
        assert!(snapshot.current_channel.is_none());
        assert!(store.channel_messages("general").is_empty());
    }

    #[test]
    fn channel_count_tracks_stored_messages_not_server_seed() {
        let store = DashboardStore::new();
        assert!(store.apply(&ServerMessage::ChannelsList {
            channels: vec![ChannelInfo {
                name: "general".to_string(),
                participants: Vec::new(),
                message_count: 5,
            }],
        }));
        store.add_channel_message(ChannelMessage::new(
            "general".into(),
            "a1".into(),
            "hi".into(),
            1.0,
        ));
        assert_eq!(
            store.snapshot().channels.first().map(|c| c.message_count),
            Some(1)
        );
        store.add_channel_message(ChannelMessage::new(
            "general".into(),
            "a2".into(),
            "yo".into(),
            2.0,
        ));
        assert_eq!(
            store.snapshot().channels.first().map(|c| c.message_count),
            Some(2)
        );
    }

    #[test]
    fn apply_routes_stream_messages() {
        let store = DashboardStore::new();

        assert!(store.apply(&ServerMessage::TeamCreated {
            team_name: "alpha".to_string(),
            team: team("alpha", "d"),
        }));
        assert!(store.apply(&ServerMessage::TeamMessage {
            team_name: "alpha".to_string(),
            message: message("idle", TeamMessage::IDLE_NOTIFICATION),
        }));
        assert!(store.apply(&ServerMessage::TeamMessage {
            team_name: "alpha".to_string(),
            message: message("m1", "message"),
        }));
        assert!(store.apply(&ServerMessage::Agents {
            agents: vec![AgentInfo {
                name: "a1".to_string(),
                role: "coder".to_string(),
                status: AgentStatus::Running,
                last_activity: None,
                task_count: 0,
            }],
            cluster_name: None,
        }));
        assert!(store.apply(&ServerMessage::HealthEvent {
            event: HealthEvent {
                agent_name: "a1".to_string(),
                team_name: "alpha".to_string(),
                status: "error".to_string(),
                timestamp: String::new(),
                details: None,
            },
        }));
        assert!(!store.apply(&ServerMessage::Pong { timestamp: None }));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.teams.len(), 1);
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.agents.len(), 1);
        assert!(snapshot.has_errors);
        assert_eq!(
            snapshot.system_logs.first().map(|l| l.level),
            Some(LogLevel::Success)
        );
    }

    #[test]
    fn projected_kinds_are_known_server_kinds() {
        for kind in PROJECTED_KINDS {
            assert!(ServerMessage::KINDS.contains(&kind), "{kind} is not a server kind");
        }
    }

    #[test]
    fn reset_clears_everything() {
        let store = DashboardStore::new();
        store.add_team(team("alpha", "d"));
        store.set_has_errors(true);
        store.reset();
        assert_eq!(store.snapshot(), DashboardSnapshot::default());
    }
}
