// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage and key-value traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use nexa_config::model::StorageConfig;
use nexa_core::types::{Message, Suggestion, Ticket, User};
use nexa_core::{
    AdapterType, HealthStatus, KeyValueStore, NexaError, PluginAdapter, StorageAdapter,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened lazily by [`StorageAdapter::initialize`]; every
/// other operation fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create an adapter for the configured path without opening it.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already opened database; `initialize` then fails as a double init.
    pub fn from_database(db: Database) -> Self {
        Self {
            config: StorageConfig {
                database_path: String::new(),
                wal_mode: false,
            },
            db: OnceCell::new_with(Some(db)),
        }
    }

    fn db(&self) -> Result<&Database, NexaError> {
        self.db.get().ok_or_else(|| NexaError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), NexaError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, NexaError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await;
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), NexaError> {
        if let Some(db) = self.db.get() {
            self.checkpoint(db).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), NexaError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| NexaError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), NexaError> {
        let db = self.db()?;
        self.checkpoint(db).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, NexaError> {
        queries::users::find_user_by_email(self.db()?, email).await
    }

    async fn upsert_user(&self, user: &User) -> Result<User, NexaError> {
        queries::users::upsert_user(self.db()?, user).await
    }

    async fn insert_message(&self, message: &Message) -> Result<bool, NexaError> {
        queries::messages::insert_message(self.db()?, message).await
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<Message>, NexaError> {
        queries::messages::recent_messages(self.db()?, limit).await
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<bool, NexaError> {
        queries::tickets::insert_ticket(self.db()?, ticket).await
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, NexaError> {
        queries::tickets::list_tickets(self.db()?).await
    }

    async fn close_ticket(&self, id: &str) -> Result<bool, NexaError> {
        queries::tickets::close_ticket(self.db()?, id).await
    }

    async fn delete_ticket(&self, id: &str) -> Result<bool, NexaError> {
        queries::tickets::delete_ticket(self.db()?, id).await
    }

    async fn insert_suggestion(&self, suggestion: &Suggestion) -> Result<bool, NexaError> {
        queries::suggestions::insert_suggestion(self.db()?, suggestion).await
    }

    async fn list_suggestions(&self) -> Result<Vec<Suggestion>, NexaError> {
        queries::suggestions::list_suggestions(self.db()?).await
    }

    async fn delete_suggestion(&self, id: &str) -> Result<bool, NexaError> {
        queries::suggestions::delete_suggestion(self.db()?, id).await
    }
}

#[async_trait]
impl KeyValueStore for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, NexaError> {
        queries::kv::get(self.db()?, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), NexaError> {
        queries::kv::set(self.db()?, key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), NexaError> {
        queries::kv::remove(self.db()?, key).await
    }
}
