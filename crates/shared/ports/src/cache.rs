use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::CacheResult;

/// Counters reported by a cache backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Live entries currently stored
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped because their TTL elapsed
    pub expired: u64,
}

/// Port for the key-value cache used to memoize aggregate computations
///
/// Values are JSON documents so any backend (in-memory, Redis, ...) can
/// store them without knowing the domain types.
#[async_trait]
pub trait SentimentCache: Send + Sync {
    /// Fetch a live value; expired or absent keys yield `None`
    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Store a value that expires after `ttl`
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> CacheResult<()>;

    /// Whether the backend is reachable
    async fn is_connected(&self) -> bool;

    /// Current counters
    async fn stats(&self) -> CacheStats;

    /// Release the backend connection; later calls may fail
    async fn shutdown(&self) {}

    /// Backend name for health reporting
    fn name(&self) -> &str {
        "cache"
    }
}
