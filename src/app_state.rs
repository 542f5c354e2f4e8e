//! Composition root: the one realtime connection and everything bound to it.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::MonitorConfig;
use crate::domain::DashboardStore;
use crate::error::MonitorError;
use crate::service::DashboardService;
use crate::ws::RealtimeClient;

/// Shared application state.
///
/// Owns the lifecycle of the realtime connection: consumers receive clones
/// of [`AppState::client`] to register listeners, but only
/// [`AppState::shutdown`] tears the connection down.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The process-wide realtime connection.
    pub client: RealtimeClient,
    /// REST client for hydration.
    pub api: ApiClient,
    /// Dashboard state.
    pub store: Arc<DashboardStore>,
    /// Stream-to-store wiring.
    pub service: Arc<DashboardService>,
}

impl AppState {
    /// Builds every component from configuration. Nothing connects yet.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidUrl`] for a bad WebSocket or REST URL,
    /// or [`MonitorError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, MonitorError> {
        let client = RealtimeClient::new(config.realtime.clone())?;
        let api = ApiClient::new(&config.api_url, config.http_timeout)?;
        let store = Arc::new(DashboardStore::new());
        let service = Arc::new(DashboardService::bind(
            client.clone(),
            api.clone(),
            Arc::clone(&store),
        ));
        Ok(Self {
            client,
            api,
            store,
            service,
        })
    }

    /// Unbinds the store and closes the connection. Safe to call repeatedly.
    pub fn shutdown(&self) {
        self.service.unbind();
        self.client.disconnect();
        tracing::info!("monitor shut down");
    }
}
