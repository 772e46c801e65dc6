// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Cardlex provider gateway.
//!
//! This crate provides the shared vocabulary of the workspace: the closed
//! purpose and provider enums, chat and conversation types, per-purpose
//! output schemas, the failure classifier, and the key-value storage trait
//! every other crate builds on.

pub mod classify;
pub mod error;
pub mod kv;
pub mod purpose;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use classify::{
    classify, classify_send_error, ClassifiedError, ErrorKind, ProviderSendError, TransportError,
};
pub use error::CardlexError;
pub use kv::KvStore;
pub use purpose::{requests_mnemonic, OutputSchema, PurposeType};
pub use types::{
    CanonicalResult, ChatMessage, ChatRole, Conversation, ProviderKind, CONVERSATION_WINDOW,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardlex_error_has_all_variants() {
        // Verify all 5 error variants exist and can be constructed.
        let _config = CardlexError::Config("test".into());
        let _storage = CardlexError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _vault = CardlexError::Vault("test".into());
        let _provider = CardlexError::Provider {
            message: "test".into(),
            source: None,
        };
        let _internal = CardlexError::Internal("test".into());
    }

    #[test]
    fn error_kind_has_eight_variants() {
        let variants = [
            ErrorKind::Validation,
            ErrorKind::Decryption,
            ErrorKind::Network,
            ErrorKind::Auth,
            ErrorKind::UnsupportedModel,
            ErrorKind::RateLimit,
            ErrorKind::Parse,
            ErrorKind::Unknown,
        ];
        assert_eq!(variants.len(), 8, "ErrorKind must have exactly 8 variants");
    }

    #[test]
    fn kv_store_trait_is_object_safe() {
        fn _assert_object_safe(_store: &dyn KvStore) {}
    }
}
