// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the KV trait for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use cardlex_core::{CardlexError, KvStore};
use serde_json::Value;

/// A `HashMap` behind a mutex. Batches are atomic because the lock is held
/// for the whole batch.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        MemoryKvStore::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>, CardlexError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CardlexError::Internal("kv mutex poisoned".to_string()))?;
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    async fn set(&self, batch: HashMap<String, Value>) -> Result<(), CardlexError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CardlexError::Internal("kv mutex poisoned".to_string()))?;
        entries.extend(batch);
        Ok(())
    }
}
