//! Cache Facade Module
//!
//! Public cache type: a [`Store`] plus an optional [`Sweeper`], with the
//! default-expiration policy applied on `set`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::{CacheStats, Entry, Expiration, Store};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::Sweeper;

// == Cache ==
/// In-process key-value cache with per-entry expiration.
///
/// A cache built with a sweep interval runs a background [`Sweeper`] that
/// physically removes expired entries. The sweeper is stopped by
/// [`Cache::close`] or when the cache is dropped, whichever comes first.
/// Reads hide expired entries whether or not a sweeper is running.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use expiry_cache::{Cache, Expiration};
///
/// let cache = Cache::new(Duration::from_secs(60));
/// cache.set_default("foo", "bar");
/// cache.set("session", "abc", Expiration::After(Duration::from_millis(50)));
///
/// assert_eq!(cache.get("foo"), Some("bar"));
/// ```
#[derive(Debug)]
pub struct Cache<V> {
    /// TTL substituted for `Expiration::Default`, None = never expire
    default_expiration: Option<Duration>,
    /// Entry storage, shared only with the sweeper
    store: Arc<Store<V>>,
    /// Background sweeper, present if a sweep interval was configured
    sweeper: Option<Sweeper>,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache without automatic sweeping.
    ///
    /// Expired entries stay hidden from reads; call
    /// [`delete_expired`](Self::delete_expired) to reclaim them.
    ///
    /// # Arguments
    /// * `default_expiration` - TTL used for `Expiration::Default`. `Never`,
    ///   `Default` and zero all mean such entries never expire.
    pub fn new(default_expiration: impl Into<Expiration>) -> Self {
        let default_expiration = default_expiration.into().resolve(None);
        debug!(?default_expiration, "Cache created without sweeper");

        Self {
            default_expiration,
            store: Arc::new(Store::new()),
            sweeper: None,
        }
    }

    /// Creates a cache that sweeps expired entries every `sweep_interval`.
    ///
    /// A zero interval creates no sweeper, exactly like [`Cache::new`].
    ///
    /// # Errors
    /// Returns [`CacheError::RuntimeUnavailable`](crate::CacheError::RuntimeUnavailable)
    /// if a sweeper is requested outside a tokio runtime.
    pub fn with_sweeper(
        default_expiration: impl Into<Expiration>,
        sweep_interval: Duration,
    ) -> Result<Self> {
        let mut cache = Self::new(default_expiration);
        if !sweep_interval.is_zero() {
            cache.sweeper = Some(Sweeper::spawn(&cache.store, sweep_interval)?);
        }
        Ok(cache)
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_sweeper(config.default_expiration, config.sweep_interval)
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry for `key`.
    ///
    /// `Expiration::Default` is replaced by the cache's default expiration.
    pub fn set(&self, key: impl Into<String>, value: V, expiration: impl Into<Expiration>) {
        let ttl = expiration.into().resolve(self.default_expiration);
        self.store.set(key, value, ttl);
    }

    /// Stores a value with the cache's default expiration.
    pub fn set_default(&self, key: impl Into<String>, value: V) {
        self.set(key, value, Expiration::Default);
    }

    // == Get ==
    /// Retrieves a live value by key.
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.get(key)
    }

    /// Retrieves a live value and its expiration instant (None = never).
    pub fn get_with_expiration(&self, key: &str) -> Option<(V, Option<DateTime<Utc>>)> {
        self.store.get_with_expiration(key)
    }

    // == Delete ==
    /// Removes an entry by key. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        self.store.delete(key);
    }

    /// Removes every expired entry now, returning how many were removed.
    pub fn delete_expired(&self) -> usize {
        self.store.delete_expired()
    }

    /// Removes all entries.
    pub fn flush(&self) {
        self.store.flush();
    }

    // == Items ==
    /// Returns a snapshot of every live entry.
    pub fn items(&self) -> HashMap<String, Entry<V>> {
        self.store.items()
    }
}

impl<V> Cache<V> {
    // == Lifecycle ==
    /// Stops the background sweeper, if any.
    ///
    /// Idempotent and non-blocking. The cache stays fully usable afterwards;
    /// only automatic sweeping ends.
    pub fn close(&self) {
        if let Some(sweeper) = &self.sweeper {
            sweeper.stop();
        }
    }

    /// Returns true if this cache was built with a sweeper.
    pub fn has_sweeper(&self) -> bool {
        self.sweeper.is_some()
    }

    /// Returns true while the background sweeper task is alive.
    pub fn sweeper_running(&self) -> bool {
        self.sweeper
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }

    /// Returns the default expiration applied by `set_default`.
    pub fn default_expiration(&self) -> Option<Duration> {
        self.default_expiration
    }

    // == Introspection ==
    /// Returns the number of entries held, including unswept expired ones.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}

impl<V> Drop for Cache<V> {
    fn drop(&mut self) {
        self.close();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DEFAULT_EXPIRATION, NO_EXPIRATION};
    use std::thread::sleep;

    #[test]
    fn test_new_cache_has_no_sweeper() {
        let cache: Cache<String> = Cache::new(DEFAULT_EXPIRATION);

        assert!(cache.is_empty());
        assert!(!cache.has_sweeper());
        assert!(!cache.sweeper_running());
        assert_eq!(cache.default_expiration(), None);
    }

    #[test]
    fn test_zero_interval_needs_no_runtime() {
        let cache: Cache<u8> =
            Cache::with_sweeper(Duration::from_secs(60), Duration::ZERO).unwrap();
        assert!(!cache.has_sweeper());
    }

    #[test]
    fn test_sweeper_outside_runtime_fails() {
        let result: Result<Cache<u8>> =
            Cache::with_sweeper(Duration::from_secs(60), Duration::from_millis(10));
        assert!(matches!(result, Err(crate::CacheError::RuntimeUnavailable)));
    }

    #[test]
    fn test_set_with_default_expiration() {
        let cache = Cache::new(Duration::from_secs(10));

        cache.set("foo", "bar", DEFAULT_EXPIRATION);

        let (value, expires_at) = cache.get_with_expiration("foo").unwrap();
        assert_eq!(value, "bar");
        assert!(expires_at.is_some(), "Default expiration should be applied");
    }

    #[test]
    fn test_set_with_zero_duration_uses_default() {
        let cache = Cache::new(Duration::from_millis(20));

        cache.set("foo", "bar", Duration::ZERO);
        sleep(Duration::from_millis(50));

        assert!(cache.get("foo").is_none());
    }

    #[test]
    fn test_set_with_zero_after_uses_default() {
        let cache = Cache::new(Duration::from_millis(20));

        cache.set("foo", 1, Expiration::After(Duration::ZERO));

        let (_, expires_at) = cache.get_with_expiration("foo").unwrap();
        assert!(expires_at.is_some(), "Default expiration should be applied");
        sleep(Duration::from_millis(50));
        assert!(cache.get("foo").is_none());
    }

    #[test]
    fn test_set_with_no_expiration_ignores_default() {
        let cache = Cache::new(Duration::from_millis(20));

        cache.set("foo", "bar", NO_EXPIRATION);
        sleep(Duration::from_millis(50));

        let (value, expires_at) = cache.get_with_expiration("foo").unwrap();
        assert_eq!(value, "bar");
        assert!(expires_at.is_none());
    }

    #[test]
    fn test_set_default_without_default_never_expires() {
        let cache = Cache::new(NO_EXPIRATION);

        cache.set_default("foo", 1);

        let (_, expires_at) = cache.get_with_expiration("foo").unwrap();
        assert!(expires_at.is_none());
    }

    #[test]
    fn test_custom_expiration_overrides_default() {
        let cache = Cache::new(Duration::from_secs(3600));
        let before = Utc::now();

        cache.set("foo", 1, Duration::from_secs(10));

        let (_, expires_at) = cache.get_with_expiration("foo").unwrap();
        assert!(expires_at.unwrap() < before + chrono::Duration::seconds(11));
    }

    #[test]
    fn test_delete_and_flush() {
        let cache = Cache::new(NO_EXPIRATION);
        cache.set_default("a", 1);
        cache.set_default("b", 2);

        cache.delete("a");
        cache.delete("missing");
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("b"), Some(2));

        cache.flush();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_close_without_sweeper_is_noop() {
        let cache: Cache<u8> = Cache::new(NO_EXPIRATION);
        cache.close();
        cache.close();
    }

    #[tokio::test]
    async fn test_sweeper_reclaims_expired_entries() {
        let cache = Cache::with_sweeper(NO_EXPIRATION, Duration::from_millis(20)).unwrap();
        assert!(cache.sweeper_running());

        cache.set("short", 1, Duration::from_millis(10));
        cache.set_default("forever", 2);

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("forever"), Some(2));
    }

    #[tokio::test]
    async fn test_close_stops_sweeper_and_is_idempotent() {
        let cache: Cache<u8> =
            Cache::with_sweeper(NO_EXPIRATION, Duration::from_millis(20)).unwrap();

        cache.close();
        cache.close();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(cache.has_sweeper());
        assert!(!cache.sweeper_running());

        // Still usable after close, with manual sweeping
        cache.set("x", 1, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.delete_expired(), 1);
    }

    #[tokio::test]
    async fn test_huge_sweep_interval_keeps_sweeper_alive() {
        let cache: Cache<u8> = Cache::with_sweeper(NO_EXPIRATION, Duration::MAX).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.sweeper_running());
    }

    #[tokio::test]
    async fn test_last_arc_drop_stops_sweeper() {
        let cache: Arc<Cache<u8>> = Arc::new(
            Cache::with_sweeper(NO_EXPIRATION, Duration::from_millis(20)).unwrap(),
        );
        let store = Arc::clone(&cache.store);
        let clone = Arc::clone(&cache);

        drop(cache);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.stats().sweeps > 0, "Still referenced, still sweeping");

        drop(clone);
        tokio::time::sleep(Duration::from_millis(60)).await;

        let sweeps = store.stats().sweeps;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.stats().sweeps, sweeps, "No sweeps after last drop");
    }

    #[tokio::test]
    async fn test_drop_stops_sweeper() {
        let cache: Cache<u8> =
            Cache::with_sweeper(NO_EXPIRATION, Duration::from_millis(20)).unwrap();
        let store = Arc::clone(&cache.store);

        drop(cache);
        tokio::time::sleep(Duration::from_millis(60)).await;

        let sweeps = store.stats().sweeps;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.stats().sweeps, sweeps, "No sweeps after drop");
    }
}
