//! orchestrator-monitor entry point.
//!
//! Connects to the backend, mirrors its activity into the dashboard store
//! and logs it until interrupted.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use orchestrator_monitor::app_state::AppState;
use orchestrator_monitor::config::MonitorConfig;
use orchestrator_monitor::ws::{ConnectionState, ServerMessage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also reads .env, which may set RUST_LOG)
    let config = MonitorConfig::from_env().context("invalid monitor configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        ws = %config.realtime.url,
        api = %config.api_url,
        channels = ?config.realtime.channels,
        "starting orchestrator-monitor"
    );

    let state = AppState::from_config(&config).context("failed to build monitor")?;

    if let Err(err) = state.service.hydrate().await {
        tracing::warn!(error = %err, "initial team load failed; waiting for the stream");
    }
    if let Some(team) = config.team.clone()
        && let Err(err) = state.service.select_team(Some(team.clone())).await
    {
        tracing::warn!(%team, error = %err, "initial team fetch failed");
    }

    let _states = state.client.on_state_change(|next| match next {
        ConnectionState::Error => tracing::error!(state = %next, "realtime connection gave up"),
        _ => tracing::info!(state = %next, "realtime connection"),
    });
    let _messages = state.client.on("team_message", |envelope| {
        if let Ok(ServerMessage::TeamMessage { team_name, message }) = envelope.decode() {
            let preview: String = message.content.chars().take(80).collect();
            tracing::info!(
                team = %team_name,
                from = %message.sender,
                to = %message.recipient,
                kind = %message.message_type,
                "{preview}"
            );
        }
    });
    let _logs = state.client.on("system_log", |envelope| {
        if let Ok(ServerMessage::SystemLog { level, content, .. }) = envelope.decode() {
            tracing::info!(level = ?level, "{content}");
        }
    });

    state.client.connect();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    let snapshot = state.store.snapshot();
    tracing::info!(
        teams = snapshot.teams.len(),
        messages = snapshot.message_counts.total,
        tasks = snapshot.task_stats.total,
        "shutting down"
    );
    state.shutdown();

    Ok(())
}
