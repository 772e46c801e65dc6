// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rolling-hash result cache for popup translations.
//!
//! Entries live in the KV store under `cache.{hash}_{language}` and expire
//! lazily: an entry past its TTL reads as a miss but is never deleted, the
//! next write for the key simply overwrites it. Distinct texts can hash to
//! the same key; the cache serves whatever was written last and a stale
//! collision costs one popup showing a neighbor's translation.

use std::collections::HashMap;
use std::sync::Arc;

use cardlex_core::kv::keys;
use cardlex_core::{CardlexError, KvStore};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 31-based rolling hash over UTF-16 code units, wrapping in `i32`.
///
/// Matches the host extension's historical key derivation, so cache
/// entries written by older installs stay addressable. Values can be
/// negative; they render in decimal inside the key.
pub fn rolling_hash(text: &str) -> i32 {
    let mut hash: i32 = 0;
    for unit in text.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    hash
}

/// One cached translation with its write timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTranslation {
    pub translation: String,
    pub created_at: DateTime<Utc>,
}

/// KV-backed cache for [`cardlex_core::PurposeType::TranslationPopup`] results.
pub struct TranslationCache {
    kv: Arc<dyn KvStore>,
    ttl: Duration,
}

impl TranslationCache {
    pub fn new(kv: Arc<dyn KvStore>, ttl_hours: u32) -> Self {
        TranslationCache {
            kv,
            ttl: Duration::hours(i64::from(ttl_hours)),
        }
    }

    /// Look up a cached translation for the text and language.
    ///
    /// Expired and malformed entries read as misses. Neither is deleted;
    /// the slot stays until the next write claims it.
    pub async fn get(&self, text: &str, language: &str) -> Result<Option<String>, CardlexError> {
        let key = keys::cache(rolling_hash(text), language);
        let wanted = vec![key.clone()];
        let mut found = self.kv.get(&wanted).await?;
        let Some(value) = found.remove(&key) else {
            return Ok(None);
        };

        let entry: CachedTranslation = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %key, error = %e, "cache entry is malformed, treating as a miss");
                return Ok(None);
            }
        };

        let age = Utc::now().signed_duration_since(entry.created_at);
        if age >= self.ttl {
            debug!(key = %key, "cache entry expired");
            return Ok(None);
        }
        Ok(Some(entry.translation))
    }

    /// Write a translation for the text and language, overwriting whatever
    /// occupied the slot.
    pub async fn put(
        &self,
        text: &str,
        language: &str,
        translation: &str,
    ) -> Result<(), CardlexError> {
        let key = keys::cache(rolling_hash(text), language);
        let entry = CachedTranslation {
            translation: translation.to_string(),
            created_at: Utc::now(),
        };
        let mut entries = HashMap::new();
        entries.insert(
            key,
            serde_json::to_value(&entry)
                .map_err(|e| CardlexError::Internal(format!("failed to serialize cache entry: {e}")))?,
        );
        self.kv.set(entries).await
    }
}
