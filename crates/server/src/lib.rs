//! Presence Chat Server Library
//!
//! Participants join, post public or private messages, poll the log and are
//! evicted by a background reaper once they stop sending heartbeats.

pub mod chat;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use chat::{ChatManager, InactivityReaper};
use config::{AppState, ChatServerConfig};
use store::{MessageStore, ParticipantStore};

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chat_server=debug,tower_http=info,info".into());

    // Already set when embedded in tests; ignore.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Full application router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    handlers::router()
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    let config = ChatServerConfig::from_env();
    info!("=== Chat Server ===");
    info!(
        "Reaper: every {:?}, stale after {:?}",
        config.reaper_interval, config.stale_after
    );

    let pool = store::connect(&config.database_url, config.max_connections).await?;
    let participants = ParticipantStore::new(pool.clone());
    let messages = MessageStore::new(pool.clone());

    let chat = Arc::new(ChatManager::new(participants.clone(), messages.clone()));
    info!("Chat Manager initialized");

    let shutdown = CancellationToken::new();
    let reaper = InactivityReaper::new(
        participants,
        messages,
        config.reaper_interval,
        config.stale_after,
    )
    .spawn(shutdown.child_token());

    let app_state = AppState { chat };
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Chat Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Err(e) = reaper.await {
        warn!("Reaper task ended abnormally: {}", e);
    }
    pool.close().await;
    info!("Chat Server stopped");

    Ok(())
}

async fn shutdown_signal(token: CancellationToken) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = token.cancelled() => {}
    }
}
