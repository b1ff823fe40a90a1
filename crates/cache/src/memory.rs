use async_trait::async_trait;
use dashmap::DashMap;
use herald_ports::{CacheError, CacheResult, CacheStats, SentimentCache};
use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

/// Stored entry count at which `set` first sweeps expired entries
pub const DEFAULT_PURGE_THRESHOLD: usize = 256;

/// In-memory TTL cache
///
/// Clones share the same storage. Expired entries are dropped lazily on
/// `get` and swept in bulk by `set` once the map reaches the purge mark.
#[derive(Clone)]
pub struct InMemoryCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    counters: Arc<Counters>,
    connected: Arc<AtomicBool>,
    purge_threshold: usize,
    next_purge_at: Arc<AtomicUsize>,
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCache {
    /// Create a connected, empty cache
    pub fn new() -> Self {
        Self::with_purge_threshold(DEFAULT_PURGE_THRESHOLD)
    }

    /// Create a cache that sweeps expired entries once `threshold` are stored
    pub fn with_purge_threshold(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            entries: Arc::new(DashMap::new()),
            counters: Arc::new(Counters::default()),
            connected: Arc::new(AtomicBool::new(true)),
            purge_threshold: threshold,
            next_purge_at: Arc::new(AtomicUsize::new(threshold)),
        }
    }

    pub fn connect(&self) {
        self.connected.store(true, Ordering::SeqCst);
        info!("In-memory cache connected");
    }

    /// Disconnect and drop all entries
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.entries.clear();
        info!("In-memory cache disconnected");
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            self.counters
                .expired
                .fetch_add(removed as u64, Ordering::Relaxed);
            debug!("Purged {} expired cache entries", removed);
        }
        removed
    }

    /// Number of stored entries, expired ones included
    pub fn stored_entries(&self) -> usize {
        self.entries.len()
    }

    /// Sweep when the map has grown to the purge mark. The mark then moves
    /// to twice the live count so a map full of live entries is not swept
    /// on every write.
    fn purge_if_due(&self) {
        if self.entries.len() < self.next_purge_at.load(Ordering::Relaxed) {
            return;
        }
        self.purge_expired();
        let live = self.entries.len();
        self.next_purge_at
            .store(live.saturating_mul(2).max(self.purge_threshold), Ordering::Relaxed);
    }

    fn ensure_connected(&self) -> CacheResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::Disconnected)
        }
    }
}

#[async_trait]
impl SentimentCache for InMemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        self.ensure_connected()?;
        let now = Instant::now();

        let live = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(_) => None,
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }
        };

        match live {
            Some(value) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value))
            }
            None => {
                // Guard was dropped above; safe to remove now
                if self
                    .entries
                    .remove_if(key, |_, entry| entry.is_expired(now))
                    .is_some()
                {
                    self.counters.expired.fetch_add(1, Ordering::Relaxed);
                }
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> CacheResult<()> {
        self.ensure_connected()?;
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::Backend(format!("ttl {:?} overflows", ttl)))?;
        self.purge_if_due();
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn stats(&self) -> CacheStats {
        let now = Instant::now();
        CacheStats {
            entries: self.entries.iter().filter(|e| !e.is_expired(now)).count(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            expired: self.counters.expired.load(Ordering::Relaxed),
        }
    }

    async fn shutdown(&self) {
        self.disconnect();
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = InMemoryCache::new();
        cache
            .set("k", json!({"a": 1}), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(json!({"a": 1})));
        assert_eq!(cache.get("missing").await.unwrap(), None);

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let cache = InMemoryCache::new();
        cache
            .set("short", json!(1), Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get("short").await.unwrap(), None);
        let stats = cache.stats().await;
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.expired, 1);
    }

    #[tokio::test]
    async fn test_overwrite_refreshes_value() {
        let cache = InMemoryCache::new();
        cache.set("k", json!(1), Duration::from_secs(60)).await.unwrap();
        cache.set("k", json!(2), Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = InMemoryCache::new();
        cache.set("a", json!(1), Duration::ZERO).await.unwrap();
        cache.set("b", json!(2), Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.get("b").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_set_sweeps_expired_entries_at_threshold() {
        let cache = InMemoryCache::with_purge_threshold(3);
        for key in ["a", "b", "c"] {
            cache.set(key, json!(key), Duration::ZERO).await.unwrap();
        }
        assert_eq!(cache.stored_entries(), 3);

        cache.set("d", json!("d"), Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.stored_entries(), 1);
        assert_eq!(cache.stats().await.expired, 3);
        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.get("d").await.unwrap(), Some(json!("d")));
    }

    #[tokio::test]
    async fn test_live_entries_move_the_purge_mark() {
        let cache = InMemoryCache::with_purge_threshold(2);
        for key in ["a", "b", "c", "d", "e"] {
            cache.set(key, json!(key), Duration::from_secs(60)).await.unwrap();
        }

        assert_eq!(cache.stored_entries(), 5);
        assert_eq!(cache.stats().await.entries, 5);
        assert_eq!(cache.stats().await.expired, 0);
    }

    #[tokio::test]
    async fn test_disconnected_cache_errors() {
        let cache = InMemoryCache::new();
        cache.set("k", json!(1), Duration::from_secs(60)).await.unwrap();
        cache.disconnect();

        assert!(!cache.is_connected().await);
        assert_eq!(cache.get("k").await, Err(CacheError::Disconnected));
        assert_eq!(
            cache.set("k", json!(1), Duration::from_secs(1)).await,
            Err(CacheError::Disconnected)
        );

        cache.connect();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let cache = InMemoryCache::new();
        let other = cache.clone();
        cache.set("k", json!("v"), Duration::from_secs(60)).await.unwrap();
        assert_eq!(other.get("k").await.unwrap(), Some(json!("v")));
    }

    #[tokio::test]
    async fn test_shutdown_through_port() {
        let cache: Arc<dyn SentimentCache> = Arc::new(InMemoryCache::new());
        cache.set("k", json!(1), Duration::from_secs(60)).await.unwrap();
        cache.shutdown().await;
        assert!(!cache.is_connected().await);
        assert_eq!(cache.get("k").await, Err(CacheError::Disconnected));
    }
}
