// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Nexa chat system.
//!
//! This crate provides the domain types, the workspace error type, the
//! clock and retention policy, and the adapter traits implemented by the
//! storage, client and test crates.

pub mod api;
pub mod clock;
pub mod error;
pub mod retention;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::NexaError;
pub use retention::RetentionPolicy;
pub use types::{
    AdapterType, AdminCredentials, HealthStatus, Message, PingStatus, Role, Snapshot,
    SnapshotPatch, Suggestion, Ticket, TicketStatus, User, is_valid_email,
};

pub use traits::{KeyValueStore, PluginAdapter, RemoteSource, StorageAdapter};

/// Version string reported by `ping` and `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
