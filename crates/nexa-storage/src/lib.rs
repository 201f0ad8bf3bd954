// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Nexa.
//!
//! One migrated database file holds the server's users, messages, tickets
//! and suggestions, plus a `kv` table that backs the client's local store.
//! All access goes through a single `tokio-rusqlite` connection.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
