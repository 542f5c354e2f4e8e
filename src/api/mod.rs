//! REST layer: typed client for the backend's `/api` endpoints.
//!
//! Used to hydrate the dashboard store on startup and after reconnects;
//! live updates come over the realtime socket.

pub mod client;
pub mod dto;

pub use client::ApiClient;
pub use dto::{HealthStatus, TeamStatus};
