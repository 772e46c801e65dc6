// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value storage trait mirroring the host extension's storage API.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CardlexError;

/// Batched key-value storage.
///
/// `set` takes a whole batch because one batch is the atomicity unit:
/// multi-key records (the credential blob and its password) are replaced
/// in a single call so readers never observe half a pair.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the given keys. Absent keys are simply absent from the map.
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>, CardlexError>;

    /// Write all entries in one batch, overwriting existing values.
    async fn set(&self, entries: HashMap<String, Value>) -> Result<(), CardlexError>;
}

/// Well-known keys and key builders for the records the gateway stores.
pub mod keys {
    use crate::purpose::PurposeType;

    /// Encrypted credential blob, JSON-serialized.
    pub const CREDENTIAL_BLOB: &str = "credential.blob";
    /// Installation password paired with the credential blob.
    pub const CREDENTIAL_PASSWORD: &str = "credential.password";
    /// Stored provider preference record (provider tag + model id).
    pub const PREFERENCE: &str = "preference";

    /// Conversation record key for a (user, purpose) pair.
    pub fn conversation(user_id: &str, purpose: PurposeType) -> String {
        format!("conversation.{user_id}.{purpose}")
    }

    /// Cache entry key for a hashed source text and language key.
    pub fn cache(hash: i32, language: &str) -> String {
        format!("cache.{hash}_{language}")
    }
}

#[cfg(test)]
mod tests {
    use super::keys;
    use crate::purpose::PurposeType;

    #[test]
    fn conversation_keys_embed_user_and_purpose() {
        assert_eq!(
            keys::conversation("u1", PurposeType::Flashcard),
            "conversation.u1.flashcard"
        );
        assert_eq!(
            keys::conversation("u2", PurposeType::TranslationPopup),
            "conversation.u2.translation_popup"
        );
    }

    #[test]
    fn cache_keys_join_hash_and_language_with_an_underscore() {
        assert_eq!(keys::cache(12345, "fr"), "cache.12345_fr");
        // Rolling hashes wrap; negative values are legal key material.
        assert_eq!(keys::cache(-98765, "es"), "cache.-98765_es");
    }
}
