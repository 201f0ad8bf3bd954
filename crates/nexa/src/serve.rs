// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nexa serve` command implementation.
//!
//! Opens the SQLite store, builds the gateway state and serves `/api` until
//! SIGINT or SIGTERM.

use std::sync::Arc;

use nexa_client::shutdown;
use nexa_config::model::NexaConfig;
use nexa_core::{NexaError, PluginAdapter, StorageAdapter};
use nexa_gateway::AppState;
use nexa_storage::SqliteStorage;
use tracing::{info, warn};

/// Runs the `nexa serve` command.
pub async fn run_serve(config: NexaConfig) -> Result<(), NexaError> {
    init_tracing(&config.app.log_level);

    info!(
        name = %config.app.name,
        version = nexa_core::VERSION,
        "starting nexa serve"
    );
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage ready");
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

    let cancel = shutdown::install_signal_handler();
    let state = AppState::new(storage.clone(), &config);
    if !state.admin.is_configured() {
        warn!("no admin account configured; admin actions will be refused");
    }
    nexa_gateway::start_server(&config, state, cancel).await?;

    if let Err(e) = storage.shutdown().await {
        warn!(error = %e, "storage checkpoint on shutdown failed (non-fatal)");
    }
    info!("nexa serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides `log_level`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nexa={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();
}
