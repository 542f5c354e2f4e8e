//! Realtime layer: the shared WebSocket client, its session loop, message
//! types, listener registry and channel subscriptions.
//!
//! The client connects to the backend's `/ws` endpoint, keeps the socket
//! alive with an application-level heartbeat, reconnects after transient
//! failures and fans inbound frames out to listeners keyed by `type`.

pub mod client;
mod connection;
pub mod listeners;
pub mod messages;
pub mod state;
pub mod subscription;

pub use client::RealtimeClient;
pub use listeners::{HandlerId, Subscription};
pub use messages::{ClientMessage, Envelope, ServerMessage};
pub use state::ConnectionState;
