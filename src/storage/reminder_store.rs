//! Persistence adapter for the reminder list and the fired log.
//!
//! Two namespaces on top of a [`Store`]: the full reminder list serialized
//! as JSON under one fixed key, and one presence marker per (reminder, date)
//! pair that has already fired. Marker *existence* is the significant bit;
//! the stored value is a sentinel.
//!
//! The reminder list is overwritten wholesale on every save: last write
//! wins, no diffing. Stored entries are not validated here; a malformed
//! entry simply never matches during evaluation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

use crate::features::reminders::schedule::{date_key, Reminder};
use crate::storage::Store;

/// Cache holding the serialized reminder list
pub const REMINDERS_CACHE: &str = "tracker-reminders-data";

/// Cache holding one entry per (reminder, date) pair that has fired
pub const FIRED_CACHE: &str = "tracker-fired-log";

/// Fixed key for the reminder list inside [`REMINDERS_CACHE`]
const REMINDERS_KEY: &str = "reminders";

/// Sentinel value stored for fired markers
const FIRED_SENTINEL: &str = "1";

/// Composite key identifying one fired marker.
///
/// Serialized for storage as `<id>/<YYYY-MM-DD>`. The date is always the
/// final segment, so ids containing `/` survive the round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredKey {
    pub id: String,
    pub date: NaiveDate,
}

impl FiredKey {
    pub fn new(id: &str, date: NaiveDate) -> Self {
        FiredKey {
            id: id.to_string(),
            date,
        }
    }

    /// Storage form: `<id>/<YYYY-MM-DD>`.
    pub fn storage_key(&self) -> String {
        format!("{}/{}", self.id, date_key(self.date))
    }

    /// Parse a storage key back into its parts. Returns `None` when the key
    /// has no `/` or its trailing segment is not a valid date.
    pub fn parse(key: &str) -> Option<Self> {
        let (id, date_str) = key.rsplit_once('/')?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
        Some(FiredKey {
            id: id.to_string(),
            date,
        })
    }
}

/// The agent's view of persisted reminder state.
#[derive(Clone)]
pub struct ReminderStore {
    store: Arc<dyn Store>,
}

impl ReminderStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        ReminderStore { store }
    }

    /// Replace the stored reminder list with `reminders`.
    pub async fn save_reminders(&self, reminders: &[Reminder]) -> Result<()> {
        let json = serde_json::to_string(reminders)?;
        self.store.put(REMINDERS_CACHE, REMINDERS_KEY, &json).await
    }

    /// Load the stored reminder list.
    ///
    /// A missing list is an empty list. Read and parse failures surface as
    /// errors here; the evaluator collapses them to an empty list at its
    /// boundary.
    pub async fn load_reminders(&self) -> Result<Vec<Reminder>> {
        match self.store.get(REMINDERS_CACHE, REMINDERS_KEY).await? {
            Some(json) => {
                serde_json::from_str(&json).context("stored reminder list failed to parse")
            }
            None => Ok(Vec::new()),
        }
    }

    /// Whether a fired marker exists for `id` on `date`.
    pub async fn has_fired(&self, id: &str, date: NaiveDate) -> Result<bool> {
        let key = FiredKey::new(id, date);
        Ok(self
            .store
            .get(FIRED_CACHE, &key.storage_key())
            .await?
            .is_some())
    }

    /// Record that `id` fired on `date`. Writing an existing marker again is
    /// a no-op overwrite.
    pub async fn mark_fired(&self, id: &str, date: NaiveDate) -> Result<()> {
        let key = FiredKey::new(id, date);
        self.store
            .put(FIRED_CACHE, &key.storage_key(), FIRED_SENTINEL)
            .await
    }

    /// Delete every fired marker strictly older than `before`. Returns the
    /// number of markers removed.
    ///
    /// Keys that fail to parse as `<id>/<date>` are left in place; the
    /// original log format only ever compared valid date suffixes.
    pub async fn prune_fired(&self, before: NaiveDate) -> Result<usize> {
        let mut removed = 0;
        for raw_key in self.store.keys(FIRED_CACHE).await? {
            let Some(key) = FiredKey::parse(&raw_key) else {
                debug!("Skipping unparseable fired-log key {raw_key:?}");
                continue;
            };
            if key.date < before {
                self.store.delete(FIRED_CACHE, &raw_key).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> ReminderStore {
        ReminderStore::new(Arc::new(MemoryStore::new()))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_list_is_empty() {
        assert!(store().load_reminders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let store = store();
        let reminders = vec![
            Reminder {
                id: "r1".to_string(),
                time: "09:00".to_string(),
                days: vec![1, 3, 5],
                label: Some("morning".to_string()),
            },
            Reminder {
                id: "r2".to_string(),
                time: "21:30".to_string(),
                days: vec![],
                label: None,
            },
        ];

        store.save_reminders(&reminders).await.unwrap();
        let loaded = store.load_reminders().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "r1");
        assert_eq!(loaded[1].days, Vec::<u8>::new());
    }

    #[tokio::test]
    async fn test_save_overwrites_wholesale() {
        let store = store();
        let first = vec![Reminder {
            id: "r1".to_string(),
            time: "09:00".to_string(),
            days: vec![],
            label: None,
        }];
        store.save_reminders(&first).await.unwrap();
        store.save_reminders(&[]).await.unwrap();

        assert!(store.load_reminders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_list_errors() {
        let inner = Arc::new(MemoryStore::new());
        inner
            .put(REMINDERS_CACHE, "reminders", "{not json")
            .await
            .unwrap();

        let store = ReminderStore::new(inner);
        assert!(store.load_reminders().await.is_err());
    }

    #[tokio::test]
    async fn test_mark_fired_is_idempotent() {
        let inner = Arc::new(MemoryStore::new());
        let store = ReminderStore::new(inner.clone());
        let d = date(2025, 1, 6);

        store.mark_fired("r1", d).await.unwrap();
        store.mark_fired("r1", d).await.unwrap();

        assert!(store.has_fired("r1", d).await.unwrap());
        assert_eq!(inner.keys(FIRED_CACHE).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_prune_deletes_strictly_older() {
        let store = store();
        let today = date(2025, 1, 8);
        let yesterday = date(2025, 1, 7);
        let stale = date(2025, 1, 6);

        store.mark_fired("r1", today).await.unwrap();
        store.mark_fired("r1", yesterday).await.unwrap();
        store.mark_fired("r1", stale).await.unwrap();
        store.mark_fired("r2", stale).await.unwrap();

        let removed = store.prune_fired(yesterday).await.unwrap();
        assert_eq!(removed, 2);

        assert!(store.has_fired("r1", today).await.unwrap());
        assert!(store.has_fired("r1", yesterday).await.unwrap());
        assert!(!store.has_fired("r1", stale).await.unwrap());
        assert!(!store.has_fired("r2", stale).await.unwrap());
    }

    #[test]
    fn test_fired_key_roundtrip_with_slash_in_id() {
        let key = FiredKey::new("group/r1", date(2025, 1, 6));
        assert_eq!(key.storage_key(), "group/r1/2025-01-06");
        assert_eq!(FiredKey::parse("group/r1/2025-01-06"), Some(key));
    }

    #[test]
    fn test_fired_key_rejects_garbage() {
        assert_eq!(FiredKey::parse("no-separator"), None);
        assert_eq!(FiredKey::parse("r1/not-a-date"), None);
        assert_eq!(FiredKey::parse("r1/2025-13-40"), None);
    }
}
