//! # Storage Module
//!
//! Named-cache key/value persistence for the agent.
//!
//! The agent keeps two independent namespaces: the serialized reminder list
//! under a fixed key, and one presence marker per (reminder, date) pair that
//! has already fired. Both live behind the [`Store`] trait so the durable
//! SQLite store and the in-memory test store are interchangeable; everything
//! above this layer receives an explicit store handle rather than reaching
//! for a process-wide global.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Structured FiredKey replaces raw string keys in the adapter API
//! - 1.1.0: SQLite-backed store alongside the in-memory store
//! - 1.0.0: Initial creation with Store trait and in-memory implementation

pub mod memory;
pub mod reminder_store;
pub mod sqlite;

pub use memory::MemoryStore;
pub use reminder_store::{FiredKey, ReminderStore, FIRED_CACHE, REMINDERS_CACHE};
pub use self::sqlite::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;

/// A store of named caches, each mapping string keys to string values.
///
/// `put` overwrites silently, so repeated writes of the same record are
/// idempotent. `keys` enumerates a single cache, which is all the pruner
/// needs; there is no cross-cache enumeration.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the value stored under `key` in `cache`, if any.
    async fn get(&self, cache: &str, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key` in `cache`, replacing any prior value.
    async fn put(&self, cache: &str, key: &str, value: &str) -> Result<()>;

    /// Remove the entry under `key` in `cache`. Removing a missing key is
    /// not an error.
    async fn delete(&self, cache: &str, key: &str) -> Result<()>;

    /// Enumerate every key currently present in `cache`.
    async fn keys(&self, cache: &str) -> Result<Vec<String>>;
}
