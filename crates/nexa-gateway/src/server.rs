// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::get;
use nexa_config::model::NexaConfig;
use nexa_core::{NexaError, StorageAdapter};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AdminAuth;
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageAdapter>,
    pub admin: AdminAuth,
    /// How many of the newest messages `get_messages` returns.
    pub message_cap: usize,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageAdapter>, config: &NexaConfig) -> Self {
        Self {
            storage,
            admin: AdminAuth::from_config(&config.auth),
            message_cap: config.server.message_cap,
            start_time: Instant::now(),
        }
    }
}

/// Build the gateway router.
///
/// - GET/POST/OPTIONS /api (action-multiplexed)
/// - GET /health
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api",
            get(handlers::get_api)
                .post(handlers::post_api)
                .options(handlers::options_api),
        )
        .route("/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the listening socket. Port 0 picks a free port.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener, NexaError> {
    let addr = format!("{host}:{port}");
    TcpListener::bind(&addr)
        .await
        .map_err(|e| NexaError::Unavailable(format!("failed to bind gateway to {addr}: {e}")))
}

/// Serve on `listener` until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    cancel: CancellationToken,
) -> Result<(), NexaError> {
    let addr = listener
        .local_addr()
        .map_err(|e| NexaError::Internal(format!("gateway socket has no address: {e}")))?;
    info!(%addr, "gateway listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| NexaError::Internal(format!("gateway server error: {e}")))?;

    info!("gateway stopped");
    Ok(())
}

/// Bind `[server] host:port` and serve until `cancel` fires.
pub async fn start_server(
    config: &NexaConfig,
    state: AppState,
    cancel: CancellationToken,
) -> Result<(), NexaError> {
    let listener = bind(&config.server.host, config.server.port).await?;
    serve(listener, state, cancel).await
}
