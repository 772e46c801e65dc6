// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed implementation of the KV trait.
//!
//! `get` is one `IN (...)` select; `set` is one transaction. The
//! transaction is what makes a batch the atomicity unit the credential
//! pair relies on.

use std::collections::HashMap;

use async_trait::async_trait;
use cardlex_core::{CardlexError, KvStore};
use serde_json::Value;
use tracing::warn;

use crate::database::{storage_err, Database};

/// Key-value store persisted in the `kv_entries` table.
#[derive(Clone)]
pub struct SqliteKvStore {
    db: Database,
}

impl SqliteKvStore {
    pub fn new(db: Database) -> Self {
        SqliteKvStore { db }
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>, CardlexError> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let keys = keys.to_vec();
        self.db
            .connection()
            .call(move |conn| {
                let placeholders: Vec<String> =
                    (1..=keys.len()).map(|i| format!("?{i}")).collect();
                let sql = format!(
                    "SELECT key, value FROM kv_entries WHERE key IN ({})",
                    placeholders.join(", ")
                );
                let mut stmt = conn.prepare(&sql)?;
                let params: Vec<&dyn rusqlite::types::ToSql> = keys
                    .iter()
                    .map(|k| k as &dyn rusqlite::types::ToSql)
                    .collect();

                let mut out = HashMap::new();
                let mut rows = stmt.query(params.as_slice())?;
                while let Some(row) = rows.next()? {
                    let key: String = row.get(0)?;
                    let raw: String = row.get(1)?;
                    match serde_json::from_str(&raw) {
                        Ok(value) => {
                            out.insert(key, value);
                        }
                        Err(_) => {
                            // Treated as absent; the writer only ever stores JSON.
                            warn!(key = %key, "skipping kv entry with invalid JSON");
                        }
                    }
                }
                Ok(out)
            })
            .await
            .map_err(storage_err)
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<(), CardlexError> {
        if entries.is_empty() {
            return Ok(());
        }
        let now = chrono::Utc::now().to_rfc3339();
        let rows: Vec<(String, String)> = entries
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();

        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT OR REPLACE INTO kv_entries (key, value, updated_at) \
                         VALUES (?1, ?2, ?3)",
                    )?;
                    for (key, value) in &rows {
                        stmt.execute(rusqlite::params![key, value, now])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn fresh_store() -> SqliteKvStore {
        SqliteKvStore::new(Database::open_in_memory().await.unwrap())
    }

    fn entries(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn set_then_get_roundtrip() {
        let store = fresh_store().await;
        store
            .set(entries(&[
                ("conversation.u1.flashcard", json!({ "messages": [] })),
                ("preference", json!({ "provider": "openai", "model": "gpt-4o-mini" })),
            ]))
            .await
            .unwrap();

        let got = store
            .get(&[
                "conversation.u1.flashcard".to_string(),
                "preference".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got["preference"]["provider"], "openai");
    }

    #[tokio::test]
    async fn absent_keys_are_absent_from_the_map() {
        let store = fresh_store().await;
        store
            .set(entries(&[("present", json!(1))]))
            .await
            .unwrap();

        let got = store
            .get(&["present".to_string(), "missing".to_string()])
            .await
            .unwrap();

        assert_eq!(got.len(), 1);
        assert!(got.contains_key("present"));
        assert!(!got.contains_key("missing"));
    }

    #[tokio::test]
    async fn set_overwrites_existing_values() {
        let store = fresh_store().await;
        store.set(entries(&[("k", json!("old"))])).await.unwrap();
        store.set(entries(&[("k", json!("new"))])).await.unwrap();

        let got = store.get(&["k".to_string()]).await.unwrap();
        assert_eq!(got["k"], json!("new"));
    }

    #[tokio::test]
    async fn empty_batches_are_noops() {
        let store = fresh_store().await;
        store.set(HashMap::new()).await.unwrap();
        let got = store.get(&[]).await.unwrap();
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");

        {
            let store = SqliteKvStore::new(Database::open(&path, true).await.unwrap());
            store
                .set(entries(&[("credential.blob", json!({ "salt": "AA==" }))]))
                .await
                .unwrap();
        }

        let store = SqliteKvStore::new(Database::open(&path, true).await.unwrap());
        let got = store.get(&["credential.blob".to_string()]).await.unwrap();
        assert_eq!(got["credential.blob"]["salt"], "AA==");
    }

    #[tokio::test]
    async fn invalid_json_rows_are_treated_as_absent() {
        let store = fresh_store().await;
        store
            .db
            .connection()
            .call(|conn| {
                conn.execute(
                    "INSERT INTO kv_entries (key, value, updated_at) VALUES ('broken', '{not json', '')",
                    [],
                )?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();

        let got = store.get(&["broken".to_string()]).await.unwrap();
        assert!(got.is_empty());
    }
}
