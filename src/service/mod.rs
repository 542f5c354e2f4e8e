//! Service layer: keeps the dashboard store in sync with the backend.
//!
//! [`DashboardService`] routes realtime messages into the
//! [`super::domain::DashboardStore`] and refreshes per-team data over REST
//! when the socket (re)connects or the selected team changes.

pub mod dashboard_service;

pub use dashboard_service::DashboardService;
