// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Cardlex provider gateway.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and the two
//! [`cardlex_core::KvStore`] implementations: the durable SQLite one and an
//! in-memory one for tests.

pub mod database;
pub mod kv;
pub mod memory;
pub mod migrations;

pub use database::Database;
pub use kv::SqliteKvStore;
pub use memory::MemoryKvStore;
