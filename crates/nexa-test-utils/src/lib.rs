// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Nexa integration tests.
//!
//! Provides a fake remote and a live gateway harness for fast,
//! deterministic tests without external services.
//!
//! # Components
//!
//! - [`MockRemote`] - in-memory `RemoteSource` with injectable ping failures
//! - [`TestHarness`] - gateway on an ephemeral port over a temp SQLite file
//! - [`fixtures`] - sample messages, tickets, suggestions and users

pub mod fixtures;
pub mod harness;
pub mod mock_remote;

pub use harness::TestHarness;
pub use mock_remote::MockRemote;
