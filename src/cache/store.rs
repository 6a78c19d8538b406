//! Cache Store Module
//!
//! Expiring map guarded by a single reader/writer lock.
//!
//! Reads (`get`, `get_with_expiration`, `items`) take the shared lock and treat
//! expired entries as absent without removing them. Mutations (`set`,
//! `delete`, `delete_expired`, `flush`) take the exclusive lock. Physical
//! removal of expired entries happens only in `delete_expired`, which holds
//! the exclusive lock for the whole pass.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheStats, Entry};

// == Cache Store ==
/// Thread-safe mapping from string keys to expiring entries.
#[derive(Debug)]
pub struct Store<V> {
    /// Key-value storage
    items: RwLock<HashMap<String, Entry<V>>>,
    /// Performance statistics
    stats: StatsCounters,
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Store<V> {
    // == Constructor ==
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            stats: StatsCounters::default(),
        }
    }

    // == Set ==
    /// Stores a key-value pair, overwriting any existing entry for `key`.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - TTL counted from now; `None` or zero means no expiration
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let entry = Entry::new(value, ttl, Utc::now());
        self.items.write().insert(key.into(), entry);
    }

    // == Delete ==
    /// Removes an entry by key. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        let mut items = self.items.write();
        remove_locked(&mut items, key);
    }

    // == Delete Expired ==
    /// Removes every entry whose expiration instant has passed.
    ///
    /// Returns the number of entries removed.
    pub fn delete_expired(&self) -> usize {
        let now = Utc::now();
        let mut items = self.items.write();

        let expired: Vec<String> = items
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        let removed = expired
            .iter()
            .filter(|key| remove_locked(&mut items, key))
            .count();
        drop(items);

        self.stats.record_sweep(removed);
        removed
    }

    // == Flush ==
    /// Removes all entries, live or expired.
    pub fn flush(&self) {
        self.items.write().clear();
    }

    // == Length ==
    /// Returns the number of entries physically held, including expired
    /// entries that have not been swept yet.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    // == Is Empty ==
    /// Returns true if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }
}

impl<V: Clone> Store<V> {
    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Returns None if the key is absent or its entry has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_with_expiration(key).map(|(value, _)| value)
    }

    // == Get With Expiration ==
    /// Retrieves a live value together with its expiration instant.
    ///
    /// The instant is None for entries that never expire.
    pub fn get_with_expiration(&self, key: &str) -> Option<(V, Option<DateTime<Utc>>)> {
        let now = Utc::now();
        let items = self.items.read();

        match items.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.stats.record_hit();
                Some((entry.value.clone(), entry.expires_at))
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Items ==
    /// Returns a snapshot of every live entry.
    ///
    /// The returned map is a copy; it does not track later changes.
    pub fn items(&self) -> HashMap<String, Entry<V>> {
        let now = Utc::now();
        let items = self.items.read();

        items
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }
}

/// Removes `key` from a map whose write lock the caller already holds.
fn remove_locked<V>(items: &mut HashMap<String, Entry<V>>, key: &str) -> bool {
    items.remove(key).is_some()
}
