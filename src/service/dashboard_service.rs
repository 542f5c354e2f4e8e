//! Dashboard service: wires the realtime stream and the REST client into
//! the [`DashboardStore`].

use std::sync::{Arc, Mutex, PoisonError};

use crate::api::ApiClient;
use crate::domain::store::PROJECTED_KINDS;
use crate::domain::{DashboardStore, LogLevel, SystemLog};
use crate::error::MonitorError;
use crate::ws::{ConnectionState, Envelope, RealtimeClient, Subscription};

/// Keeps the store in sync with the backend.
///
/// Registers one handler per projected message kind on the shared
/// [`RealtimeClient`]. Binding never opens or closes the connection; the
/// owner of the client does that.
#[derive(Debug)]
pub struct DashboardService {
    client: RealtimeClient,
    api: ApiClient,
    store: Arc<DashboardStore>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl DashboardService {
    /// Registers the store's handlers on `client`.
    #[must_use]
    pub fn bind(client: RealtimeClient, api: ApiClient, store: Arc<DashboardStore>) -> Self {
        let mut subscriptions = Vec::with_capacity(PROJECTED_KINDS.len() + 2);

        for kind in PROJECTED_KINDS {
            let store = Arc::clone(&store);
            subscriptions.push(client.on(kind, move |envelope: &Envelope| {
                match envelope.decode() {
                    Ok(message) => {
                        store.apply(&message);
                    }
                    Err(err) => {
                        tracing::warn!(kind = %envelope.kind, error = %err, "undecodable message");
                    }
                }
            }));
        }

        {
            let store = Arc::clone(&store);
            let api = api.clone();
            subscriptions.push(client.on("connected", move |_| {
                let Some(team) = store.selected_team() else {
                    return;
                };
                let store = Arc::clone(&store);
                let api = api.clone();
                tokio::spawn(async move {
                    if let Err(err) = refresh_team(&api, &store, &team).await {
                        tracing::warn!(%team, error = %err, "refresh after connect failed");
                    }
                });
            }));
        }

        {
            let store = Arc::clone(&store);
            subscriptions.push(client.on_state_change(move |state| match state {
                ConnectionState::Error => store.add_system_log(SystemLog::now(
                    LogLevel::Error,
                    "realtime connection failed; reconnect attempts exhausted",
                )),
                ConnectionState::Disconnected => store.add_system_log(SystemLog::now(
                    LogLevel::Warning,
                    "realtime connection closed",
                )),
                ConnectionState::Connecting | ConnectionState::Connected => {}
            }));
        }

        tracing::debug!(handlers = subscriptions.len(), "dashboard service bound");
        Self {
            client,
            api,
            store,
            subscriptions: Mutex::new(subscriptions),
        }
    }

    /// Removes every handler registered by [`DashboardService::bind`]. The
    /// connection itself is left alone. Safe to call repeatedly.
    pub fn unbind(&self) {
        let subscriptions = std::mem::take(
            &mut *self
                .subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if subscriptions.is_empty() {
            return;
        }
        for subscription in &subscriptions {
            subscription.unsubscribe();
        }
        tracing::debug!(handlers = subscriptions.len(), "dashboard service unbound");
    }

    /// Returns `true` while handlers are registered.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        !self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Loads the team list over REST.
    ///
    /// # Errors
    ///
    /// Propagates the REST client's error.
    pub async fn hydrate(&self) -> Result<usize, MonitorError> {
        let teams = self.api.get_teams().await?;
        let count = teams.len();
        self.store.set_teams(teams);
        tracing::info!(teams = count, "team list loaded");
        Ok(count)
    }

    /// Changes the selected team and, when it actually changed, loads its
    /// messages and tasks.
    ///
    /// # Errors
    ///
    /// Propagates the REST client's error. The selection is kept even when
    /// the fetch fails.
    pub async fn select_team(&self, team: Option<String>) -> Result<(), MonitorError> {
        if !self.store.select_team(team.clone()) {
            return Ok(());
        }
        match team {
            Some(team) => {
                tracing::info!(%team, "team selected");
                refresh_team(&self.api, &self.store, &team).await
            }
            None => {
                self.store.set_tasks(Vec::new());
                Ok(())
            }
        }
    }

    /// The store this service writes into.
    #[must_use]
    pub fn store(&self) -> &Arc<DashboardStore> {
        &self.store
    }

    /// The realtime client this service listens on.
    #[must_use]
    pub fn client(&self) -> &RealtimeClient {
        &self.client
    }
}

/// Replaces the store's messages and tasks with a fresh fetch for `team`,
/// unless the selection moved on while the requests were in flight.
async fn refresh_team(
    api: &ApiClient,
    store: &DashboardStore,
    team: &str,
) -> Result<(), MonitorError> {
    let (messages, tasks) =
        tokio::try_join!(api.get_team_messages(team), api.get_team_tasks(team))?;
    if store.selected_team().as_deref() != Some(team) {
        tracing::debug!(%team, "selection changed during refresh; discarding");
        return Ok(());
    }
    tracing::debug!(%team, messages = messages.len(), tasks = tasks.len(), "team refreshed");
    store.replace_messages(messages);
    store.set_tasks(tasks);
    Ok(())
}
