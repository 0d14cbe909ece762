//! Bounded in-memory cache with per-entry expiry.
//!
//! Each tier is an explicitly constructed [`TtlCache`] owned by the fetcher
//! that uses it. Entries are visible only while `now - inserted_at < ttl`.
//! A full tier drops expired entries first and then the least recently used.

use std::fmt::Debug;
use std::time::Duration;

use moka::future::Cache;
use moka::policy::EvictionPolicy;

/// Key-value cache with a fixed TTL and capacity, shared across requests
pub struct TtlCache<V> {
    name: &'static str,
    ttl: Duration,
    capacity: u64,
    inner: Cache<String, V>,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Create an empty tier. A zero capacity is bumped to one.
    #[must_use]
    pub fn new(name: &'static str, ttl: Duration, capacity: usize) -> Self {
        let capacity = capacity.max(1) as u64;
        let inner = Cache::builder()
            .name(name)
            .max_capacity(capacity)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self {
            name,
            ttl,
            capacity,
            inner,
        }
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self), fields(tier = self.name))]
    pub async fn get(&self, key: &str) -> Option<V> {
        let value = self.inner.get(key).await;
        if value.is_some() {
            tracing::debug!("Key found and still fresh");
        } else {
            tracing::debug!("Key not found or expired");
        }
        value
    }

    /// Stores a value, evicting expired or least recently used entries when full
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value), fields(tier = self.name))]
    pub async fn put(&self, key: &str, value: V) {
        self.inner.insert(key.to_string(), value).await;
    }
}

impl<V> Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn settled_len<V: Clone + Send + Sync + 'static>(cache: &TtlCache<V>) -> u64 {
        cache.inner.run_pending_tasks().await;
        cache.inner.entry_count()
    }

    #[tokio::test]
    async fn test_entry_visible_until_ttl() {
        let cache = TtlCache::new("test", Duration::from_millis(200), 10);
        cache.put("weather:-15.8403:-70.0217", 18.0_f64).await;

        assert_eq!(cache.get("weather:-15.8403:-70.0217").await, Some(18.0));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(cache.get("weather:-15.8403:-70.0217").await, None);
        assert_eq!(settled_len(&cache).await, 0);
    }

    #[tokio::test]
    async fn test_miss_on_unknown_key() {
        let cache: TtlCache<String> = TtlCache::new("test", Duration::from_secs(60), 10);
        assert_eq!(cache.get("pois_hotel").await, None);
    }

    #[tokio::test]
    async fn test_lru_eviction_keeps_recently_used() {
        let cache = TtlCache::new("test", Duration::from_secs(3600), 3);
        cache.put("a", 1).await;
        cache.put("b", 2).await;
        cache.put("c", 3).await;
        cache.inner.run_pending_tasks().await;

        // touch "a" so that "b" becomes the least recently used
        assert_eq!(cache.get("a").await, Some(1));
        cache.inner.run_pending_tasks().await;

        cache.put("d", 4).await;

        assert_eq!(settled_len(&cache).await, 3);
        assert_eq!(cache.get("b").await, None);
        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("c").await, Some(3));
        assert_eq!(cache.get("d").await, Some(4));
    }

    #[tokio::test]
    async fn test_overflow_never_exceeds_capacity() {
        let cache = TtlCache::new("test", Duration::from_secs(3600), 100);
        for i in 0..250 {
            cache.put(&format!("key-{i}"), i).await;
            cache.inner.run_pending_tasks().await;
        }

        assert_eq!(settled_len(&cache).await, 100);
        assert_eq!(cache.get("key-0").await, None);
        assert_eq!(cache.get("key-249").await, Some(249));
        assert_eq!(cache.get("key-150").await, Some(150));
    }

    #[tokio::test]
    async fn test_expired_entries_make_room_for_live_ones() {
        let cache = TtlCache::new("test", Duration::from_millis(200), 2);
        cache.put("old", 1).await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        cache.put("live", 2).await;
        cache.put("new", 3).await;

        assert_eq!(settled_len(&cache).await, 2);
        assert_eq!(cache.get("old").await, None);
        assert_eq!(cache.get("live").await, Some(2));
        assert_eq!(cache.get("new").await, Some(3));
    }

    #[tokio::test]
    async fn test_overwrite_same_key_does_not_evict() {
        let cache = TtlCache::new("test", Duration::from_secs(60), 2);
        cache.put("a", 1).await;
        cache.put("b", 2).await;
        cache.put("a", 10).await;

        assert_eq!(cache.get("a").await, Some(10));
        assert_eq!(cache.get("b").await, Some(2));
        assert_eq!(settled_len(&cache).await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_writers_last_write_wins() {
        let cache = Arc::new(TtlCache::new("test", Duration::from_secs(60), 100));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    cache.put("pois_hotel", i).await;
                    cache.get("pois_hotel").await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }
        assert_eq!(settled_len(&cache).await, 1);
    }
}
