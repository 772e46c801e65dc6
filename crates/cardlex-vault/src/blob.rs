// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted credential blob layout and codec.
//!
//! The blob is what actually lands in the KV store: PBKDF2 salt, AES-GCM
//! nonce, and ciphertext (tag included), each base64-encoded so the whole
//! envelope is a plain JSON object.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use cardlex_core::CardlexError;
use serde::{Deserialize, Serialize};

/// Envelope for one encrypted credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlob {
    /// 16-byte PBKDF2 salt, base64.
    pub salt: String,
    /// 12-byte AES-GCM nonce, base64.
    pub nonce: String,
    /// Ciphertext with the 16-byte authentication tag appended, base64.
    pub ciphertext: String,
}

impl EncryptedBlob {
    /// Assemble a blob from freshly produced crypto material.
    pub fn assemble(salt: &[u8; 16], nonce: &[u8; 12], ciphertext: &[u8]) -> Self {
        EncryptedBlob {
            salt: BASE64.encode(salt),
            nonce: BASE64.encode(nonce),
            ciphertext: BASE64.encode(ciphertext),
        }
    }

    /// Decode the envelope back into raw parts, validating lengths.
    pub fn parts(&self) -> Result<([u8; 16], [u8; 12], Vec<u8>), CardlexError> {
        let salt_bytes = BASE64
            .decode(&self.salt)
            .map_err(|_| CardlexError::Vault("malformed blob salt".to_string()))?;
        let salt: [u8; 16] = salt_bytes
            .try_into()
            .map_err(|_| CardlexError::Vault("blob salt must be 16 bytes".to_string()))?;

        let nonce_bytes = BASE64
            .decode(&self.nonce)
            .map_err(|_| CardlexError::Vault("malformed blob nonce".to_string()))?;
        let nonce: [u8; 12] = nonce_bytes
            .try_into()
            .map_err(|_| CardlexError::Vault("blob nonce must be 12 bytes".to_string()))?;

        let ciphertext = BASE64
            .decode(&self.ciphertext)
            .map_err(|_| CardlexError::Vault("malformed blob ciphertext".to_string()))?;

        Ok((salt, nonce, ciphertext))
    }
}
