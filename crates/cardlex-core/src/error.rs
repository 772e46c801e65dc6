// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Cardlex provider gateway.

use thiserror::Error;

/// The primary error type used across Cardlex component operations.
///
/// This covers configuration, storage, and vault plumbing below the gateway
/// boundary. Failures that cross the boundary itself are converted into
/// [`crate::ClassifiedError`] values and never thrown.
#[derive(Debug, Error)]
pub enum CardlexError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Credential vault errors. All decryption failures collapse into one
    /// message so callers cannot tell a wrong password from corrupted data.
    #[error("vault error: {0}")]
    Vault(String),

    /// Provider plumbing errors outside the classified taxonomy.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
