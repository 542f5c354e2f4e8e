//! In-process fake of the orchestrator backend: a `/ws` endpoint plus the
//! REST routes the dashboard hydrates from.

#![allow(dead_code, clippy::panic)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use orchestrator_monitor::config::RealtimeConfig;
use orchestrator_monitor::ws::ConnectionState;

/// Default wait for anything asynchronous in the tests.
pub const WAIT: Duration = Duration::from_secs(5);

/// Behaviour switches for [`Backend`].
#[derive(Debug, Clone, Copy)]
pub struct BackendOptions {
    /// Reply to `ping` with `pong`.
    pub answer_pings: bool,
    /// Send `{"type":"connected"}` when a socket opens.
    pub greet: bool,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            answer_pings: true,
            greet: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Shared {
    options: BackendOptions,
    received: Arc<Mutex<Vec<Value>>>,
    connections: Arc<AtomicUsize>,
    push: broadcast::Sender<String>,
    kick: broadcast::Sender<()>,
}

/// A running fake backend.
#[derive(Debug)]
pub struct Backend {
    /// Bound address.
    pub addr: SocketAddr,
    shared: Shared,
    task: JoinHandle<()>,
}

impl Backend {
    /// Starts a backend with default options.
    pub async fn start() -> Self {
        Self::start_with(BackendOptions::default()).await
    }

    /// Starts a backend on an ephemeral port.
    pub async fn start_with(options: BackendOptions) -> Self {
        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind fake backend");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("fake backend address");
        };
        let (push, _) = broadcast::channel(64);
        let (kick, _) = broadcast::channel(4);
        let shared = Shared {
            options,
            received: Arc::new(Mutex::new(Vec::new())),
            connections: Arc::new(AtomicUsize::new(0)),
            push,
            kick,
        };
        let router = Router::new()
            .route("/ws", get(ws_upgrade))
            .route("/api/teams", get(teams))
            .route("/api/teams/{name}/messages", get(team_messages))
            .route("/api/teams/{name}/tasks", get(team_tasks))
            .with_state(shared.clone());
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Self { addr, shared, task }
    }

    /// `ws://` URL of the socket endpoint.
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// `http://` URL of the REST base.
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Config with short timings, pointed at this backend.
    pub fn realtime_config(&self) -> RealtimeConfig {
        RealtimeConfig {
            reconnect_delay: Duration::from_millis(50),
            ..RealtimeConfig::with_url(self.ws_url())
        }
    }

    /// Sockets accepted so far.
    pub fn connections(&self) -> usize {
        self.shared.connections.load(Ordering::SeqCst)
    }

    /// Client frames received so far, in order.
    pub fn received(&self) -> Vec<Value> {
        self.shared
            .received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Received frames of one `type`.
    pub fn received_of(&self, kind: &str) -> Vec<Value> {
        self.received()
            .into_iter()
            .filter(|v| v.get("type").and_then(Value::as_str) == Some(kind))
            .collect()
    }

    /// Sends a raw text frame to every open socket.
    pub fn push_text(&self, text: impl Into<String>) {
        let _ = self.shared.push.send(text.into());
    }

    /// Sends a JSON frame to every open socket.
    pub fn push(&self, frame: &Value) {
        self.push_text(frame.to_string());
    }

    /// Closes every open socket from the server side.
    pub fn kick(&self) {
        let _ = self.shared.kick.send(());
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(shared): State<Shared>) -> Response {
    ws.on_upgrade(move |socket| session(socket, shared))
}

async fn session(mut socket: WebSocket, shared: Shared) {
    let mut push = shared.push.subscribe();
    let mut kick = shared.kick.subscribe();
    shared.connections.fetch_add(1, Ordering::SeqCst);

    if shared.options.greet {
        let hello = json!({"type": "connected", "message": "welcome"}).to_string();
        if socket.send(Message::Text(hello.into())).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            frame = socket.recv() => {
                let Some(Ok(frame)) = frame else { break };
                match frame {
                    Message::Text(text) => {
                        let Ok(value) = serde_json::from_str::<Value>(text.as_str()) else {
                            continue;
                        };
                        let is_ping = value.get("type").and_then(Value::as_str) == Some("ping");
                        let stamp = value.get("timestamp").cloned();
                        shared
                            .received
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(value);
                        if is_ping && shared.options.answer_pings {
                            let pong = json!({"type": "pong", "timestamp": stamp}).to_string();
                            if socket.send(Message::Text(pong.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Ok(text) = push.recv() => {
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            Ok(()) = kick.recv() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
        }
    }
}

/// A team as the backend serializes it.
pub fn team_json(name: &str) -> Value {
    json!({
        "name": name,
        "description": "test team",
        "createdAt": 1_700_000_000_000_i64,
        "leadAgentId": format!("lead@{name}"),
        "leadSessionId": "s-1",
        "members": [
            {"agentId": format!("a1@{name}"), "name": "a1", "agentType": "general-purpose",
             "model": "opus", "joinedAt": 1_700_000_000_100_i64, "cwd": "/work"}
        ]
    })
}

/// A team message as the backend serializes it.
pub fn message_json(id: &str, kind: &str) -> Value {
    json!({
        "id": id,
        "sender": "a1",
        "recipient": "lead",
        "content": format!("content of {id}"),
        "timestamp": "2026-01-01T00:00:00Z",
        "messageType": kind,
    })
}

async fn teams() -> Json<Value> {
    Json(json!({"teams": [team_json("alpha"), team_json("beta")]}))
}

async fn team_messages(Path(name): Path<String>) -> Response {
    if name == "ghost" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "team not found"}))).into_response();
    }
    if name == "broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({"messages": [message_json("rest-1", "task"), message_json("rest-2", "result")]}))
        .into_response()
}

async fn team_tasks(Path(name): Path<String>) -> Response {
    if name == "ghost" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "team not found"}))).into_response();
    }
    Json(json!({"tasks": [
        {"taskId": "1", "subject": "write tests", "status": "in_progress", "owner": "a1"},
        {"taskId": "2", "subject": "ship", "status": "pending"}
    ]}))
    .into_response()
}

/// A TCP listener that accepts and immediately drops every connection, so
/// each WebSocket handshake fails. Returns the address and accept counter.
pub async fn refusing_listener() -> (SocketAddr, Arc<AtomicUsize>, JoinHandle<()>) {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind refusing listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("refusing listener address");
    };
    let accepts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepts);
    let task = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });
    (addr, accepts, task)
}

/// Waits until the watched state equals `target`.
pub async fn wait_state(rx: &mut watch::Receiver<ConnectionState>, target: ConnectionState) {
    let reached = tokio::time::timeout(WAIT, rx.wait_for(|s| *s == target))
        .await
        .is_ok_and(|r| r.is_ok());
    if !reached {
        panic!("state {target} not reached; last was {}", *rx.borrow());
    }
}

/// Polls `cond` until it holds.
pub async fn wait_until<F>(what: &str, cond: F)
where
    F: Fn() -> bool,
{
    let polled = tokio::time::timeout(WAIT, async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    if polled.is_err() {
        panic!("timed out waiting for {what}");
    }
}

/// Runs `fut` with the default wait as timeout.
pub async fn within<T>(fut: impl Future<Output = T>) -> T {
    let Ok(value) = tokio::time::timeout(WAIT, fut).await else {
        panic!("operation timed out");
    };
    value
}
