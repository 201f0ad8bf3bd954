// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Backends sit behind these traits so the gateway and the client can be
//! driven by SQLite, HTTP or in-memory fakes. All async traits use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod kv;
pub mod remote;
pub mod storage;

pub use adapter::PluginAdapter;
pub use kv::KeyValueStore;
pub use remote::RemoteSource;
pub use storage::StorageAdapter;
