//! In-memory [`Store`] implementation.
//!
//! Used as the substitute store in tests and for ephemeral runs where
//! nothing needs to survive a restart.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use crate::storage::Store;

/// Process-local store over nested concurrent maps, one inner map per cache.
#[derive(Default)]
pub struct MemoryStore {
    caches: DashMap<String, DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, cache: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .caches
            .get(cache)
            .and_then(|entries| entries.get(key).map(|v| v.value().clone())))
    }

    async fn put(&self, cache: &str, key: &str, value: &str) -> Result<()> {
        self.caches
            .entry(cache.to_string())
            .or_insert_with(DashMap::new)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, cache: &str, key: &str) -> Result<()> {
        if let Some(entries) = self.caches.get(cache) {
            entries.remove(key);
        }
        Ok(())
    }

    async fn keys(&self, cache: &str) -> Result<Vec<String>> {
        Ok(self
            .caches
            .get(cache)
            .map(|entries| entries.iter().map(|e| e.key().clone()).collect())
            .unwrap_or_default())
    }
}
