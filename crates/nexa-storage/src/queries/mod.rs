// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod kv;
pub mod messages;
pub mod suggestions;
pub mod tickets;
pub mod users;
