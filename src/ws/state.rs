//! Connection state of the realtime client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of the single realtime connection.
///
/// ```text
/// disconnected ──connect()──▶ connecting ──open──▶ connected
///      ▲                          │                   │
///      └──── close / failure ─────┴───────────────────┘
///      │
///      └── retries exhausted ──▶ error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No socket, or the socket closed and a retry may be pending.
    #[default]
    Disconnected,
    /// A socket is being opened.
    Connecting,
    /// The socket is open and the heartbeat is running.
    Connected,
    /// Automatic reconnects are exhausted; a manual `connect()` is needed.
    Error,
}

impl ConnectionState {
    /// Returns the state as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }

    /// Returns `true` if the socket is open.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
