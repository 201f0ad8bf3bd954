// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Nexa chat system.

use thiserror::Error;

/// The primary error type used across all Nexa crates.
#[derive(Debug, Error)]
pub enum NexaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Remote API errors (connection refused, unexpected status, bad body).
    #[error("remote error: {message}")]
    Remote {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A dependency the operation needs is not reachable or not configured.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Caller supplied input that failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The caller is not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// JSON (de)serialization failure of a persisted or transported value.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NexaError {
    /// Shorthand for wrapping any storage-layer error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        NexaError::Storage {
            source: Box::new(err),
        }
    }

    /// Returns `true` for errors worth another attempt (network, timeout, unavailable).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            NexaError::Remote { .. } | NexaError::Timeout { .. } | NexaError::Unavailable(_)
        )
    }
}
