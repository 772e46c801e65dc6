// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle: open, pragmas, migrations.
//!
//! `tokio-rusqlite` serializes all access through one background thread, so
//! a single handle gives a single-writer concurrency model without extra
//! locking here.

use std::path::Path;

use cardlex_core::CardlexError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Convert tokio_rusqlite errors into `CardlexError::Storage`.
pub(crate) fn storage_err(e: tokio_rusqlite::Error) -> CardlexError {
    CardlexError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the WAL-mode SQLite database backing the KV store.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` and run pending migrations.
    pub async fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, CardlexError> {
        let conn = Connection::open(path.as_ref())
            .await
            .map_err(|e| CardlexError::Storage {
                source: Box::new(e),
            })?;
        Self::initialize(conn, wal_mode).await
    }

    /// Open an in-memory database. Used by tests and ephemeral runs.
    pub async fn open_in_memory() -> Result<Self, CardlexError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| CardlexError::Storage {
                source: Box::new(e),
            })?;
        Self::initialize(conn, false).await
    }

    async fn initialize(conn: Connection, wal_mode: bool) -> Result<Self, CardlexError> {
        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;

        conn.call(|conn| Ok::<_, rusqlite::Error>(crate::migrations::run_migrations(conn)))
            .await
            .map_err(storage_err)??;

        debug!("database initialized");
        Ok(Database { conn })
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}
