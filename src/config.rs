//! Monitor configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Every key is optional; invalid numeric
//! values fall back to the defaults below.

use std::time::Duration;

use reqwest::Url;

use crate::error::MonitorError;

/// Default WebSocket endpoint of a local orchestrator-cc backend.
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8000/ws";

/// Default REST base of a local orchestrator-cc backend.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Channels requested on every (re)connect unless overridden.
pub const DEFAULT_CHANNELS: [&str; 3] = ["messages", "thinking", "status"];

/// Settings for the realtime socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeConfig {
    /// WebSocket URL (`ws://` or `wss://`).
    pub url: String,

    /// Fixed delay before each automatic reconnect attempt.
    pub reconnect_delay: Duration,

    /// Automatic reconnects allowed before entering the `error` state.
    pub max_reconnect_attempts: u32,

    /// Interval between application-level pings.
    pub heartbeat_interval: Duration,

    /// Silence (no pong) after which the socket is considered dead.
    pub heartbeat_timeout: Duration,

    /// Channels named in the `subscribe` request sent on open.
    pub channels: Vec<String>,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WS_URL.to_string(),
            reconnect_delay: Duration::from_millis(3_000),
            max_reconnect_attempts: 10,
            heartbeat_interval: Duration::from_millis(15_000),
            heartbeat_timeout: Duration::from_millis(30_000),
            channels: DEFAULT_CHANNELS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl RealtimeConfig {
    /// Returns a default config pointed at `url`.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Checks that `url` parses and uses a WebSocket scheme.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidUrl`] otherwise.
    pub fn validate(&self) -> Result<(), MonitorError> {
        let parsed = Url::parse(&self.url).map_err(|e| MonitorError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "ws" | "wss" => Ok(()),
            other => Err(MonitorError::InvalidUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme `{other}`"),
            }),
        }
    }
}

/// Top-level monitor configuration.
///
/// Loaded once at startup via [`MonitorConfig::from_env`].
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Realtime socket settings.
    pub realtime: RealtimeConfig,

    /// REST base URL, e.g. `http://127.0.0.1:8000/api`.
    pub api_url: String,

    /// Per-request timeout for the REST client.
    pub http_timeout: Duration,

    /// Team to select on startup, if any.
    pub team: Option<String>,
}

impl MonitorConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidUrl`] if `MONITOR_WS_URL` or
    /// `MONITOR_API_URL` cannot be parsed.
    pub fn from_env() -> Result<Self, MonitorError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`MonitorConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MonitorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RealtimeConfig::default();

        let channels = lookup("MONITOR_CHANNELS")
            .map(|raw| parse_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.channels);

        let realtime = RealtimeConfig {
            url: lookup("MONITOR_WS_URL").unwrap_or(defaults.url),
            reconnect_delay: parse_millis(
                &lookup,
                "MONITOR_RECONNECT_DELAY_MS",
                defaults.reconnect_delay,
            ),
            max_reconnect_attempts: parse_or(
                &lookup,
                "MONITOR_MAX_RECONNECT_ATTEMPTS",
                defaults.max_reconnect_attempts,
            ),
            heartbeat_interval: parse_millis(
                &lookup,
                "MONITOR_HEARTBEAT_INTERVAL_MS",
                defaults.heartbeat_interval,
            ),
            heartbeat_timeout: parse_millis(
                &lookup,
                "MONITOR_HEARTBEAT_TIMEOUT_MS",
                defaults.heartbeat_timeout,
            ),
            channels,
        };
        realtime.validate()?;

        let api_url = lookup("MONITOR_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Url::parse(&api_url).map_err(|e| MonitorError::InvalidUrl {
            url: api_url.clone(),
            reason: e.to_string(),
        })?;

        let http_timeout = Duration::from_secs(parse_or(&lookup, "MONITOR_HTTP_TIMEOUT_SECS", 10));
        let team = lookup("MONITOR_TEAM").filter(|t| !t.trim().is_empty());

        Ok(Self {
            realtime,
            api_url,
            http_timeout,
            team,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_millis<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

/// Splits a comma-separated list, dropping empty items.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
