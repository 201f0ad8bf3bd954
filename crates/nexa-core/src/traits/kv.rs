// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! String key-value persistence used by the client's local store.

use async_trait::async_trait;

use crate::error::NexaError;

/// A flat string key-value store.
///
/// Writers are not coordinated: a `set` replaces whatever was stored, and
/// concurrent read-modify-write cycles clobber each other.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, NexaError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), NexaError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), NexaError>;
}
