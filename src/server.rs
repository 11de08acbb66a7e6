//! HTTP server initialization and runtime setup.
//!
//! Builds the record store client and session store, spawns the session
//! sweeper and runs the Axum server.

use crate::application::services::LoginService;
use crate::config::Config;
use crate::domain::repositories::AuthBackend;
use crate::infrastructure::pocketbase::PocketBaseClient;
use crate::infrastructure::session::{SessionStore, run_session_sweeper};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// How often idle sessions are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Record store client (and probes it once)
/// - In-memory session store and its sweeper
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - The record store URL is unusable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let backend = PocketBaseClient::new(&config.pocketbase_url, config.users_collection.clone())
        .context("Failed to build record store client")?;

    match backend.health().await {
        Ok(()) => tracing::info!("Record store reachable"),
        Err(e) => tracing::warn!("Record store not reachable yet: {}", e),
    }

    let login_service = Arc::new(LoginService::new(
        Arc::new(backend),
        config.users_collection.clone(),
    ));

    let sessions = Arc::new(SessionStore::new(
        config.session_secret.clone(),
        Duration::from_secs(config.session_ttl_seconds),
    ));
    tokio::spawn(run_session_sweeper(sessions.clone(), SESSION_SWEEP_INTERVAL));
    tracing::info!("Session sweeper started");

    let state = AppState::new(login_service, sessions, config.club.clone(), config.cookie_secure);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
