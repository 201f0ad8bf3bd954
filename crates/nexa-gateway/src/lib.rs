// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API gateway for Nexa.
//!
//! One `/api` endpoint multiplexed by an `action` name serves chat
//! messages, tickets, suggestions and login out of a [`StorageAdapter`].
//! CORS is fully permissive.
//!
//! [`StorageAdapter`]: nexa_core::StorageAdapter

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::AdminAuth;
pub use error::ApiError;
pub use server::{AppState, bind, router, serve, start_server};
