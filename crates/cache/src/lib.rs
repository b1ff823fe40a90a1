//! Herald Cache
//!
//! In-memory implementation of the [`SentimentCache`] port.
//!
//! Thread-safe storage using `DashMap`. Each entry carries its own expiry
//! instant; expired entries read as misses and are dropped lazily on read.
//! Writes sweep the whole map once it reaches the purge mark, and
//! [`InMemoryCache::purge_expired`] runs the same sweep on demand.
//!
//! [`SentimentCache`]: herald_ports::SentimentCache

mod memory;

pub use memory::{DEFAULT_PURGE_THRESHOLD, InMemoryCache};
