// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! KV-backed credential persistence.
//!
//! The blob and its installation password are one record split over two
//! keys. They are always written in a single batch and read in a single
//! batch; a half-present pair is treated as undecryptable, not as absent.

use std::collections::HashMap;
use std::sync::Arc;

use cardlex_core::kv::keys;
use cardlex_core::{CardlexError, KvStore};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{info, warn};

use crate::blob::EncryptedBlob;
use crate::vault::{self, mask_secret, DECRYPT_FAILED};

/// What `credential status` reports without ever printing the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStatus {
    /// No credential pair stored.
    Absent,
    /// A credential is stored and decrypts; `preview` is the masked key.
    Present { preview: String },
    /// A pair exists but does not decrypt.
    Unreadable,
}

/// Store and retrieve the user's encrypted API credential.
pub struct CredentialStore {
    kv: Arc<dyn KvStore>,
    iterations: u32,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KvStore>, iterations: u32) -> Self {
        CredentialStore { kv, iterations }
    }

    /// Encrypt `api_key` under a fresh installation password and persist
    /// the pair, replacing any previous one.
    pub async fn store(&self, api_key: &str) -> Result<(), CardlexError> {
        let password = vault::generate_installation_password()?;
        let blob = vault::encrypt_credential(api_key, &password, self.iterations)?;

        let mut entries = HashMap::new();
        entries.insert(
            keys::CREDENTIAL_BLOB.to_string(),
            serde_json::to_value(&blob)
                .map_err(|e| CardlexError::Vault(format!("failed to serialize blob: {e}")))?,
        );
        entries.insert(
            keys::CREDENTIAL_PASSWORD.to_string(),
            Value::String(password.expose_secret().to_string()),
        );

        // One batch: the pair is replaced as a unit.
        self.kv.set(entries).await?;
        info!("stored encrypted credential");
        Ok(())
    }

    /// Load and decrypt the stored credential.
    ///
    /// `None` when no pair is stored. Any decryption problem, including a
    /// half-present pair, surfaces as the single opaque vault error.
    pub async fn load(&self) -> Result<Option<SecretString>, CardlexError> {
        let wanted = vec![
            keys::CREDENTIAL_BLOB.to_string(),
            keys::CREDENTIAL_PASSWORD.to_string(),
        ];
        let mut found = self.kv.get(&wanted).await?;
        let blob_value = found.remove(keys::CREDENTIAL_BLOB);
        let password_value = found.remove(keys::CREDENTIAL_PASSWORD);

        match (blob_value, password_value) {
            (None, None) => Ok(None),
            (Some(blob_value), Some(password_value)) => {
                let blob: EncryptedBlob = serde_json::from_value(blob_value)
                    .map_err(|_| CardlexError::Vault(DECRYPT_FAILED.to_string()))?;
                let password = password_value
                    .as_str()
                    .map(|s| SecretString::from(s.to_string()))
                    .ok_or_else(|| CardlexError::Vault(DECRYPT_FAILED.to_string()))?;
                vault::decrypt_credential(&blob, &password, self.iterations).map(Some)
            }
            _ => {
                warn!("credential pair is incomplete -- blob and password must travel together");
                Err(CardlexError::Vault(DECRYPT_FAILED.to_string()))
            }
        }
    }

    /// Report the credential state for status display.
    pub async fn status(&self) -> Result<CredentialStatus, CardlexError> {
        match self.load().await {
            Ok(None) => Ok(CredentialStatus::Absent),
            Ok(Some(secret)) => Ok(CredentialStatus::Present {
                preview: mask_secret(secret.expose_secret()),
            }),
            Err(CardlexError::Vault(_)) => Ok(CredentialStatus::Unreadable),
            Err(e) => Err(e),
        }
    }
}
