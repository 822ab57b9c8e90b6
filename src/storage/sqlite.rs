//! SQLite-backed [`Store`] implementation.
//!
//! All caches share a single `kv_entries` table keyed by `(cache, key)`.
//! `INSERT OR REPLACE` gives `put` its overwrite semantics. The underlying
//! connection is not `Sync`, so it sits behind an async mutex; every
//! statement runs to completion while the lock is held.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use sqlite::{Connection, State};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::Store;

/// Durable store over a single SQLite database file.
#[derive(Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// `":memory:"` is accepted for a non-durable database.
    pub fn open(path: &str) -> Result<Self> {
        let connection = sqlite::open(path)?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS kv_entries (
                cache TEXT NOT NULL,
                key   TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (cache, key)
            )",
        )?;
        debug!("Opened kv store at {path}");

        Ok(SqliteStore {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, cache: &str, key: &str) -> Result<Option<String>> {
        let connection = self.connection.lock().await;
        let mut statement =
            connection.prepare("SELECT value FROM kv_entries WHERE cache = ? AND key = ?")?;
        statement.bind((1, cache))?;
        statement.bind((2, key))?;

        if let State::Row = statement.next()? {
            Ok(Some(statement.read::<String, _>("value")?))
        } else {
            Ok(None)
        }
    }

    async fn put(&self, cache: &str, key: &str, value: &str) -> Result<()> {
        let connection = self.connection.lock().await;
        let mut statement = connection
            .prepare("INSERT OR REPLACE INTO kv_entries (cache, key, value) VALUES (?, ?, ?)")?;
        statement.bind((1, cache))?;
        statement.bind((2, key))?;
        statement.bind((3, value))?;

        while let State::Row = statement.next()? {}
        Ok(())
    }

    async fn delete(&self, cache: &str, key: &str) -> Result<()> {
        let connection = self.connection.lock().await;
        let mut statement =
            connection.prepare("DELETE FROM kv_entries WHERE cache = ? AND key = ?")?;
        statement.bind((1, cache))?;
        statement.bind((2, key))?;

        while let State::Row = statement.next()? {}
        Ok(())
    }

    async fn keys(&self, cache: &str) -> Result<Vec<String>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare("SELECT key FROM kv_entries WHERE cache = ?")?;
        statement.bind((1, cache))?;

        let mut keys = Vec::new();
        while let State::Row = statement.next()? {
            keys.push(statement.read::<String, _>("key")?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = SqliteStore::open(":memory:").unwrap();

        store.put("c", "k", "v1").await.unwrap();
        assert_eq!(store.get("c", "k").await.unwrap(), Some("v1".to_string()));

        // Overwrite keeps a single row
        store.put("c", "k", "v2").await.unwrap();
        assert_eq!(store.get("c", "k").await.unwrap(), Some("v2".to_string()));
        assert_eq!(store.keys("c").await.unwrap().len(), 1);

        store.delete("c", "k").await.unwrap();
        assert_eq!(store.get("c", "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_caches_are_independent() {
        let store = SqliteStore::open(":memory:").unwrap();

        store.put("reminders", "list", "[]").await.unwrap();
        store.put("fired", "r1/2025-01-06", "1").await.unwrap();

        assert_eq!(store.keys("reminders").await.unwrap(), vec!["list"]);
        assert_eq!(store.keys("fired").await.unwrap(), vec!["r1/2025-01-06"]);
        assert_eq!(store.get("fired", "list").await.unwrap(), None);
    }
}
