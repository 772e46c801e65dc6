// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stored provider preference.

use std::collections::HashMap;
use std::sync::Arc;

use cardlex_core::kv::keys;
use cardlex_core::{CardlexError, KvStore, ProviderKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The user's chosen provider and model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPreference {
    pub provider: ProviderKind,
    pub model: String,
}

/// KV-backed persistence for the preference record.
pub struct PreferenceStore {
    kv: Arc<dyn KvStore>,
}

impl PreferenceStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        PreferenceStore { kv }
    }

    /// Load the stored preference. A malformed record reads as unset so
    /// configured defaults take over.
    pub async fn load(&self) -> Result<Option<ProviderPreference>, CardlexError> {
        let wanted = vec![keys::PREFERENCE.to_string()];
        let mut found = self.kv.get(&wanted).await?;
        let Some(value) = found.remove(keys::PREFERENCE) else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(preference) => Ok(Some(preference)),
            Err(e) => {
                warn!(error = %e, "preference record is malformed, using defaults");
                Ok(None)
            }
        }
    }

    /// Persist the preference, replacing any previous record.
    pub async fn store(&self, preference: &ProviderPreference) -> Result<(), CardlexError> {
        let mut entries = HashMap::new();
        entries.insert(
            keys::PREFERENCE.to_string(),
            serde_json::to_value(preference).map_err(|e| {
                CardlexError::Internal(format!("failed to serialize preference: {e}"))
            })?,
        );
        self.kv.set(entries).await
    }
}
