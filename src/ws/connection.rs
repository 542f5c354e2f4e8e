//! Per-socket session task.
//!
//! Opens the socket, then runs the read/write loop: inbound text frames are
//! dispatched to listeners, queued outbound frames are written, and the
//! heartbeat sends a ping every interval and closes the socket once no
//! pong has arrived within the timeout. When the loop ends for any reason
//! other than a client-side detach, control goes back to the reconnect
//! logic in [`super::client`].

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::client::Shared;
use super::messages::ClientMessage;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Upper bound on how long a session waits to flush its close frame.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Runs one connection attempt and its session for `generation`.
pub(crate) async fn run_session(shared: Arc<Shared>, generation: u64) {
    let url = shared.config.url.clone();
    match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((stream, _response)) => {
            let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
            if shared.on_open(generation, outbound_tx) {
                drive(&shared, generation, stream, outbound_rx).await;
            } else {
                let mut stream = stream;
                let _ = tokio::time::timeout(CLOSE_GRACE, stream.close(None)).await;
                return;
            }
        }
        Err(err) => {
            tracing::warn!(%url, error = %err, "websocket connect failed");
        }
    }
    shared.on_session_end(generation);
}

/// Read/write/heartbeat loop for an open socket.
async fn drive(
    shared: &Shared,
    generation: u64,
    stream: WsStream,
    mut outbound: mpsc::UnboundedReceiver<Message>,
) {
    let (mut ws_tx, mut ws_rx) = stream.split();
    let interval = shared.config.heartbeat_interval;
    let timeout = shared.config.heartbeat_timeout;
    let mut heartbeat = tokio::time::interval_at(Instant::now() + interval, interval);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_pong = Instant::now();

    tracing::debug!(
        interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        "heartbeat started"
    );

    loop {
        tokio::select! {
            // Outbound first so a detach is noticed before more frames are
            // dispatched.
            biased;

            cmd = outbound.recv() => {
                match cmd {
                    Some(msg) => {
                        if let Err(err) = ws_tx.send(msg).await {
                            tracing::warn!(error = %err, "websocket write failed");
                            break;
                        }
                    }
                    None => {
                        // Detached by disconnect(); close politely and leave
                        // reconnect state alone.
                        let _ = tokio::time::timeout(CLOSE_GRACE, ws_tx.send(Message::Close(None)))
                            .await;
                        tracing::debug!("heartbeat stopped");
                        return;
                    }
                }
            }
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if !shared.is_current(generation) {
                            break;
                        }
                        if shared.dispatch_text(text.as_str()) {
                            last_pong = Instant::now();
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "server closed websocket");
                        break;
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        tracing::debug!(len = bytes.len(), "ignoring binary frame");
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::warn!(error = %err, "websocket read failed");
                        break;
                    }
                    None => break,
                }
            }
            _ = heartbeat.tick() => {
                match serde_json::to_string(&ClientMessage::ping_now()) {
                    Ok(json) => {
                        if let Err(err) = ws_tx.send(Message::text(json)).await {
                            tracing::warn!(error = %err, "heartbeat ping failed");
                            break;
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "failed to encode ping"),
                }
                let silent = last_pong.elapsed();
                if silent > timeout {
                    tracing::warn!(
                        silent_ms = u64::try_from(silent.as_millis()).unwrap_or(u64::MAX),
                        "heartbeat timeout; closing socket"
                    );
                    let _ = tokio::time::timeout(CLOSE_GRACE, ws_tx.send(Message::Close(None)))
                        .await;
                    break;
                }
            }
        }
    }

    tracing::debug!("heartbeat stopped");
}
