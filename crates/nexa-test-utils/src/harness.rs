// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` runs a real gateway on an ephemeral localhost port over a
//! temp SQLite database, so clients can be pointed at `api_url()` exactly
//! as they would be at a deployed server.

use std::net::SocketAddr;
use std::sync::Arc;

use nexa_config::model::{NexaConfig, StorageConfig};
use nexa_core::{NexaError, StorageAdapter};
use nexa_gateway::AppState;
use nexa_storage::SqliteStorage;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    admin: Option<(String, String)>,
    message_cap: Option<usize>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            admin: None,
            message_cap: None,
        }
    }

    /// Configure the admin account.
    pub fn with_admin(mut self, email: &str, password: &str) -> Self {
        self.admin = Some((email.to_string(), password.to_string()));
        self
    }

    /// Cap the number of messages `get_messages` returns.
    pub fn with_message_cap(mut self, cap: usize) -> Self {
        self.message_cap = Some(cap);
        self
    }

    /// Open storage, bind port 0 and start serving.
    pub async fn build(self) -> Result<TestHarness, NexaError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| NexaError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("gateway.db");

        let mut config = NexaConfig::default();
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        if let Some((email, password)) = self.admin {
            config.auth.admin_email = Some(email);
            config.auth.admin_password = Some(password);
        }
        if let Some(cap) = self.message_cap {
            config.server.message_cap = cap;
        }
        config.client.local_db_path = temp_dir
            .path()
            .join("client.db")
            .to_string_lossy()
            .to_string();

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let listener = nexa_gateway::bind(&config.server.host, 0).await?;
        let addr = listener
            .local_addr()
            .map_err(|e| NexaError::Internal(format!("harness socket has no address: {e}")))?;
        config.client.api_url = format!("http://{addr}/api");

        let cancel = CancellationToken::new();
        let state = AppState::new(storage.clone(), &config);
        let server = tokio::spawn(nexa_gateway::serve(listener, state, cancel.clone()));

        Ok(TestHarness {
            config,
            storage,
            addr,
            cancel,
            server: Some(server),
            _temp_dir: temp_dir,
        })
    }
}

/// A running gateway with temp storage. The server stops on drop.
pub struct TestHarness {
    /// Configuration with `client.api_url` pointing at this gateway.
    pub config: NexaConfig,
    /// The gateway's storage, for seeding and assertions.
    pub storage: Arc<dyn StorageAdapter>,
    addr: SocketAddr,
    cancel: CancellationToken,
    server: Option<JoinHandle<Result<(), NexaError>>>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Start a harness with default settings.
    pub async fn start() -> Result<Self, NexaError> {
        Self::builder().build().await
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Full URL of the `/api` endpoint.
    pub fn api_url(&self) -> &str {
        &self.config.client.api_url
    }

    /// Stop the server and wait for it to finish.
    pub async fn shutdown(mut self) -> Result<(), NexaError> {
        self.cancel.cancel();
        match self.server.take() {
            Some(handle) => handle
                .await
                .map_err(|e| NexaError::Internal(format!("gateway task failed: {e}")))?,
            None => Ok(()),
        }
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
