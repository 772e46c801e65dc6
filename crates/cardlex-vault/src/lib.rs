// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential vault for the Cardlex provider gateway.
//!
//! The user's API key is encrypted with AES-256-GCM under a key derived via
//! PBKDF2-HMAC-SHA256 from a machine-generated installation password, and
//! the (blob, password) pair is persisted through the KV store as one unit.

pub mod blob;
pub mod crypto;
pub mod kdf;
pub mod store;
pub mod vault;

pub use blob::EncryptedBlob;
pub use kdf::DEFAULT_ITERATIONS;
pub use store::{CredentialStatus, CredentialStore};
pub use vault::{
    decrypt_credential, encrypt_credential, generate_installation_password, mask_secret,
    DECRYPT_FAILED,
};
