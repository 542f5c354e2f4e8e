//! # orchestrator-monitor
//!
//! Realtime client and dashboard state for the orchestrator-cc monitoring
//! backend.
//!
//! The crate keeps one self-healing WebSocket connection to the backend's
//! `/ws` endpoint, dispatches its `type`-tagged JSON messages to
//! registered listeners, and projects them into an in-memory dashboard
//! store hydrated over REST.
//!
//! ## Architecture
//!
//! ```text
//! Backend (/ws, /api)
//!     │
//!     ├── RealtimeClient (ws/)      one shared socket, heartbeat, reconnect
//!     ├── ApiClient (api/)          REST hydration
//!     │
//!     ├── DashboardService (service/)
//!     │
//!     └── DashboardStore (domain/)
//! ```
//!
//! [`app_state::AppState`] is the composition root: it builds the single
//! [`ws::RealtimeClient`] and owns its lifecycle.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
