//! The realtime client: one shared, self-healing connection to `/ws`.
//!
//! [`RealtimeClient`] is a cheap `Clone` handle. Every clone talks to the
//! same socket, the same listener registries and the same reconnect state,
//! so it is constructed once at the composition root and handed to
//! consumers. Consumers register and unregister listeners; only the owner
//! of the connection's lifecycle calls [`RealtimeClient::disconnect`].
//!
//! Each socket lives on its own Tokio task (see [`super::connection`]).
//! Control state is guarded by a mutex and stamped with a generation
//! counter; any event from a session or timer whose generation is no
//! longer current is ignored.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use super::connection;
use super::listeners::{HandlerId, ListenerRegistry, Subscription};
use super::messages::{ClientMessage, Envelope};
use super::state::ConnectionState;
use super::subscription::ChannelSet;
use crate::config::RealtimeConfig;
use crate::error::MonitorError;

/// Mutable connection bookkeeping.
#[derive(Debug)]
struct Control {
    state: ConnectionState,
    generation: u64,
    attempts: u32,
    channels: ChannelSet,
    outbound: Option<mpsc::UnboundedSender<Message>>,
    session: Option<JoinHandle<()>>,
    reconnect: Option<JoinHandle<()>>,
    /// Transitions not yet delivered to state listeners, oldest first.
    pending: VecDeque<ConnectionState>,
    /// Set while some thread is draining `pending`.
    notifying: bool,
}

impl Control {
    fn session_active(&self) -> bool {
        self.session.as_ref().is_some_and(|h| !h.is_finished())
    }
}

/// State shared by every client handle and the background tasks.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) config: RealtimeConfig,
    messages: Arc<ListenerRegistry<String, Envelope>>,
    states: Arc<ListenerRegistry<(), ConnectionState>>,
    state_tx: watch::Sender<ConnectionState>,
    control: Mutex<Control>,
}

impl Shared {
    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.control().generation == generation
    }

    /// Applies a transition and notifies observers if the state changed.
    fn set_state(&self, next: ConnectionState) {
        self.transition(None, next);
    }

    /// Like [`Shared::set_state`], but only while `generation` is current.
    pub(crate) fn set_state_if(&self, generation: u64, next: ConnectionState) {
        self.transition(Some(generation), next);
    }

    /// The watch channel is updated under the control lock so it never lags
    /// behind `Control::state`. Listener callbacks run outside the lock and
    /// are fed from a queue by a single draining thread, so they observe
    /// transitions in the order they were applied, including transitions
    /// made from inside a callback.
    fn transition(&self, generation: Option<u64>, next: ConnectionState) {
        let (previous, drain) = {
            let mut ctl = self.control();
            if generation.is_some_and(|g| g != ctl.generation) || ctl.state == next {
                return;
            }
            let previous = std::mem::replace(&mut ctl.state, next);
            self.state_tx.send_replace(next);
            ctl.pending.push_back(next);
            (previous, !std::mem::replace(&mut ctl.notifying, true))
        };
        tracing::debug!(from = %previous, to = %next, "connection state changed");
        if drain {
            self.drain_state_notifications();
        }
    }

    fn drain_state_notifications(&self) {
        loop {
            let next = {
                let mut ctl = self.control();
                let Some(next) = ctl.pending.pop_front() else {
                    ctl.notifying = false;
                    return;
                };
                next
            };
            self.states.dispatch(&(), &next);
        }
    }

    /// Spawns the socket task for `generation`.
    fn start_session(self: &Arc<Self>, generation: u64) {
        self.set_state_if(generation, ConnectionState::Connecting);
        let shared = Arc::clone(self);
        let handle = tokio::spawn(connection::run_session(shared, generation));
        let mut ctl = self.control();
        if ctl.generation == generation {
            ctl.session = Some(handle);
        } else {
            handle.abort();
        }
    }

    /// Called by the session task once the socket is open. Returns `false`
    /// if the session was detached while opening.
    pub(crate) fn on_open(
        &self,
        generation: u64,
        outbound: mpsc::UnboundedSender<Message>,
    ) -> bool {
        let channels = {
            let mut ctl = self.control();
            if ctl.generation != generation {
                return false;
            }
            ctl.attempts = 0;
            let channels = ctl.channels.as_slice().to_vec();
            let subscribe = ClientMessage::Subscribe {
                channels: channels.clone(),
            };
            match serde_json::to_string(&subscribe) {
                Ok(json) => {
                    let _ = outbound.send(Message::text(json));
                }
                Err(err) => tracing::warn!(error = %err, "failed to encode subscribe request"),
            }
            ctl.outbound = Some(outbound);
            channels
        };
        tracing::info!(url = %self.config.url, ?channels, "websocket connected");
        self.set_state_if(generation, ConnectionState::Connected);
        true
    }

    /// Parses and dispatches one text frame. Returns `true` for a pong.
    pub(crate) fn dispatch_text(&self, text: &str) -> bool {
        match Envelope::parse(text) {
            Ok(envelope) => {
                let delivered = self.messages.dispatch(&envelope.kind, &envelope);
                tracing::trace!(kind = %envelope.kind, delivered, "frame dispatched");
                envelope.kind == "pong"
            }
            Err(err) => {
                let preview: String = text.chars().take(120).collect();
                tracing::warn!(error = %err, frame = %preview, "dropping malformed frame");
                false
            }
        }
    }

    /// Called by the session task when its socket is gone for any reason.
    pub(crate) fn on_session_end(self: &Arc<Self>, generation: u64) {
        {
            let mut ctl = self.control();
            if ctl.generation != generation {
                return;
            }
            ctl.outbound = None;
            ctl.session = None;
        }
        tracing::info!(url = %self.config.url, "websocket closed");
        self.set_state_if(generation, ConnectionState::Disconnected);
        self.schedule_reconnect(generation);
    }

    /// Schedules exactly one reconnect after the fixed delay, or enters the
    /// `error` state once the attempt budget is spent.
    fn schedule_reconnect(self: &Arc<Self>, generation: u64) {
        let max = self.config.max_reconnect_attempts;
        let delay = self.config.reconnect_delay;
        let mut ctl = self.control();
        if ctl.generation != generation {
            return;
        }
        if ctl.attempts >= max {
            let attempts = ctl.attempts;
            drop(ctl);
            tracing::error!(attempts, "reconnect attempts exhausted; giving up");
            self.set_state_if(generation, ConnectionState::Error);
            return;
        }
        ctl.attempts += 1;
        tracing::info!(
            attempt = ctl.attempts,
            max,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "scheduling reconnect"
        );
        let shared = Arc::clone(self);
        ctl.reconnect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.fire_reconnect(generation);
        }));
    }

    fn fire_reconnect(self: &Arc<Self>, generation: u64) {
        let next = {
            let mut ctl = self.control();
            if ctl.generation != generation {
                return;
            }
            ctl.reconnect = None;
            ctl.generation += 1;
            ctl.generation
        };
        self.start_session(next);
    }

    fn send_text(&self, json: String, kind: &str) -> bool {
        let ctl = self.control();
        match (&ctl.outbound, ctl.state) {
            (Some(tx), ConnectionState::Connected) => {
                if tx.send(Message::text(json)).is_ok() {
                    tracing::trace!(kind, "message queued");
                    true
                } else {
                    tracing::warn!(kind, "websocket session gone; message dropped");
                    false
                }
            }
            (_, state) => {
                tracing::warn!(kind, %state, "websocket not connected; message dropped");
                false
            }
        }
    }
}

/// Handle to the shared realtime connection.
#[derive(Debug, Clone)]
pub struct RealtimeClient {
    shared: Arc<Shared>,
}

impl RealtimeClient {
    /// Creates a client in the `disconnected` state. No socket is opened
    /// until [`RealtimeClient::connect`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidUrl`] if the configured URL is not a
    /// `ws://` or `wss://` URL.
    pub fn new(config: RealtimeConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let channels = ChannelSet::new(config.channels.iter().cloned());
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                messages: Arc::new(ListenerRegistry::new()),
                states: Arc::new(ListenerRegistry::new()),
                state_tx,
                control: Mutex::new(Control {
                    state: ConnectionState::Disconnected,
                    generation: 0,
                    attempts: 0,
                    channels,
                    outbound: None,
                    session: None,
                    reconnect: None,
                    pending: VecDeque::new(),
                    notifying: false,
                }),
            }),
        })
    }

    /// Opens the connection.
    ///
    /// No-op while a socket is open or being opened. Otherwise cancels any
    /// pending reconnect, resets the attempt counter and starts a new
    /// session; the outcome is reported through state listeners.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn connect(&self) {
        let generation = {
            let mut ctl = self.shared.control();
            if ctl.session_active() {
                tracing::debug!(state = %ctl.state, "connect ignored; session already active");
                return;
            }
            if let Some(timer) = ctl.reconnect.take() {
                timer.abort();
            }
            ctl.attempts = 0;
            ctl.generation += 1;
            ctl.generation
        };
        tracing::info!(url = %self.shared.config.url, "connecting");
        self.shared.start_session(generation);
    }

    /// Closes the connection and cancels every pending timer.
    ///
    /// The session is detached first, so nothing it does afterwards can
    /// dispatch a frame or schedule a reconnect. Safe to call repeatedly.
    pub fn disconnect(&self) {
        let (session, timer, outbound) = {
            let mut ctl = self.shared.control();
            ctl.generation += 1;
            (ctl.session.take(), ctl.reconnect.take(), ctl.outbound.take())
        };
        if let Some(timer) = timer {
            timer.abort();
        }
        match (session, outbound) {
            // Dropping the only sender makes the session send a close frame
            // and exit.
            (Some(_detached), Some(outbound)) => drop(outbound),
            (Some(opening), None) => opening.abort(),
            _ => {}
        }
        self.shared.set_state(ConnectionState::Disconnected);
        tracing::debug!("disconnected");
    }

    /// Sends a typed command. Returns `false` (and logs) when the socket is
    /// not open; the command is not queued for later.
    pub fn send(&self, message: &ClientMessage) -> bool {
        match serde_json::to_string(message) {
            Ok(json) => self.shared.send_text(json, message.kind()),
            Err(err) => {
                tracing::warn!(kind = message.kind(), error = %err, "failed to encode message");
                false
            }
        }
    }

    /// Sends an arbitrary JSON payload. Same delivery rules as
    /// [`RealtimeClient::send`].
    pub fn send_json(&self, payload: &serde_json::Value) -> bool {
        let kind = payload
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("untyped")
            .to_string();
        match serde_json::to_string(payload) {
            Ok(json) => self.shared.send_text(json, &kind),
            Err(err) => {
                tracing::warn!(%kind, error = %err, "failed to encode payload");
                false
            }
        }
    }

    /// Registers `handler` for frames whose `type` equals `kind`.
    ///
    /// Registrations survive reconnects. Frames of a kind nobody listens to
    /// are dropped silently.
    pub fn on<F>(&self, kind: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&Envelope) + Send + Sync + 'static,
    {
        self.shared.messages.subscribe(kind.into(), Arc::new(handler))
    }

    /// Removes one registration made with [`RealtimeClient::on`]. Returns
    /// `false` if it was already removed.
    pub fn off(&self, kind: &str, id: HandlerId) -> bool {
        self.shared.messages.remove(&kind.to_string(), id)
    }

    /// Removes every message handler for `kind`, or all of them.
    pub fn remove_all_listeners(&self, kind: Option<&str>) {
        let key = kind.map(ToString::to_string);
        self.shared.messages.clear(key.as_ref());
    }

    /// Number of handlers registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: &str) -> usize {
        self.shared.messages.count(&kind.to_string())
    }

    /// Registers `handler` for connection-state transitions. Handlers run
    /// only when the state actually changes and see transitions in the
    /// order they were applied.
    pub fn on_state_change<F>(&self, handler: F) -> Subscription
    where
        F: Fn(ConnectionState) + Send + Sync + 'static,
    {
        self.shared
            .states
            .subscribe((), Arc::new(move |state: &ConnectionState| handler(*state)))
    }

    /// Returns a receiver that always holds the latest state.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state_tx.subscribe()
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.shared.control().state
    }

    /// Automatic reconnects made since the last successful open or manual
    /// [`RealtimeClient::connect`].
    #[must_use]
    pub fn reconnect_attempts(&self) -> u32 {
        self.shared.control().attempts
    }

    /// Channels requested on every open.
    #[must_use]
    pub fn channels(&self) -> Vec<String> {
        self.shared.control().channels.as_slice().to_vec()
    }

    /// Adds channels to the subscription set, sending a `subscribe` for the
    /// new ones right away when connected.
    pub fn subscribe_channels<I, S>(&self, channels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added = self.shared.control().channels.subscribe(channels);
        if !added.is_empty() && self.state().is_connected() {
            self.send(&ClientMessage::Subscribe { channels: added });
        }
    }

    /// Removes channels from the subscription set, sending an
    /// `unsubscribe` for the removed ones right away when connected.
    pub fn unsubscribe_channels<I, S>(&self, channels: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed = self.shared.control().channels.unsubscribe(channels);
        if !removed.is_empty() && self.state().is_connected() {
            self.send(&ClientMessage::Unsubscribe { channels: removed });
        }
    }

    /// The configuration the client was built with.
    #[must_use]
    pub fn config(&self) -> &RealtimeConfig {
        &self.shared.config
    }

    /// Returns `true` if both handles refer to the same connection.
    #[must_use]
    pub fn same_connection(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}
