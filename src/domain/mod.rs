//! Domain layer: orchestrator data model and the dashboard store.
//!
//! Types here mirror the JSON the backend exposes over REST and `/ws`
//! (camelCase on the wire). [`DashboardStore`] is the in-memory projection
//! both transports write into.

pub mod activity;
pub mod agent;
pub mod channel;
pub mod store;
pub mod task;
pub mod team;

pub use activity::{EmotionType, LogLevel, MessageCategory, SystemLog, TeamMessage, ThinkingLog};
pub use agent::{AgentInfo, AgentStatus, HealthEvent};
pub use channel::{ChannelInfo, ChannelMessage};
pub use store::{DashboardSnapshot, DashboardStore, MessageCounts};
pub use task::{TaskInfo, TaskStats, TaskStatus, TaskUpdate};
pub use team::{Personality, TeamInfo, TeamMember};
