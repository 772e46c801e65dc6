// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation persistence keyed by (user, purpose).
//!
//! Every record is a read-modify-write over one KV key, so the store hands
//! out one async mutex per key. The gateway holds the guard from fetch
//! through append, which is what keeps concurrent generations for the same
//! pair from dropping each other's exchange.

use std::collections::HashMap;
use std::sync::Arc;

use cardlex_core::kv::keys;
use cardlex_core::{CardlexError, Conversation, KvStore, PurposeType};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::warn;

/// KV-backed store for per-(user, purpose) conversations.
pub struct ConversationStore {
    kv: Arc<dyn KvStore>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ConversationStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        ConversationStore {
            kv,
            locks: DashMap::new(),
        }
    }

    /// Acquire the mutex for one (user, purpose) record.
    ///
    /// The guard must stay alive across the fetch, the provider exchange,
    /// and the append; dropping it releases the record to the next caller.
    pub async fn lock(&self, user_id: &str, purpose: PurposeType) -> OwnedMutexGuard<()> {
        let key = keys::conversation(user_id, purpose);
        let mutex = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// Fetch the stored conversation, or start a fresh one.
    ///
    /// The system instruction at index 0 is rewritten on every fetch so a
    /// stored record never serves an instruction rendered from an older
    /// learning goal. A malformed record is replaced, not surfaced.
    pub async fn get_or_create(
        &self,
        user_id: &str,
        purpose: PurposeType,
        system_instruction: &str,
    ) -> Result<Conversation, CardlexError> {
        let key = keys::conversation(user_id, purpose);
        let wanted = vec![key.clone()];
        let mut found = self.kv.get(&wanted).await?;

        let mut conversation = match found.remove(&key) {
            Some(value) => match serde_json::from_value::<Conversation>(value) {
                Ok(conversation) => conversation,
                Err(e) => {
                    warn!(key = %key, error = %e, "conversation record is malformed, starting fresh");
                    Conversation::new(user_id, purpose, system_instruction)
                }
            },
            None => Conversation::new(user_id, purpose, system_instruction),
        };

        conversation.rewrite_system(system_instruction);
        Ok(conversation)
    }

    /// Record one exchange, truncate to the window, and persist.
    pub async fn append_and_store(
        &self,
        conversation: &mut Conversation,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<(), CardlexError> {
        conversation.append_exchange(user_text, assistant_text);
        let key = keys::conversation(&conversation.user_id, conversation.purpose);
        let mut entries = HashMap::new();
        entries.insert(
            key,
            serde_json::to_value(&*conversation).map_err(|e| {
                CardlexError::Internal(format!("failed to serialize conversation: {e}"))
            })?,
        );
        self.kv.set(entries).await
    }
}
