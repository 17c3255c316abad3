/// Resolution cache with TTL expiry
///
/// Memoizes attribute resolution results for a short, bounded window. There is
/// no explicit invalidation; entries simply expire.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::types::CallerIdentity;

/// Key-value cache for resolved scopes
///
/// Implementations must tolerate concurrent readers and writers.
pub trait ResolutionCache: Send + Sync {
    /// Returns the unexpired value stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` for `ttl`
    fn set(&self, key: &str, value: String, ttl: Duration);

    /// Drops the entry stored under `key`
    fn remove(&self, key: &str);

    /// Number of stored entries (expired ones may still be counted)
    fn len(&self) -> usize;

    /// Whether the cache holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries
    fn clear(&self);

    /// Drops expired entries, returning how many were removed
    fn cleanup_expired(&self) -> usize;
}

/// Spawns a task sweeping expired entries from `cache` every `interval`
///
/// Must be called from within a tokio runtime. The task runs until aborted.
pub fn spawn_janitor(cache: Arc<dyn ResolutionCache>, interval: Duration) -> JoinHandle<()> {
    info!("Starting resolution cache janitor (interval={:?})", interval);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cache.cleanup_expired();
            if removed > 0 {
                debug!("Swept {} expired resolution cache entries", removed);
            }
        }
    })
}

/// Builds the cache key for a resolved scope
///
/// Attribute resolvers see the caller's identity, so results are isolated per
/// organization and user and keyed by the full scope, not its prefix.
pub fn cache_key(identity: &CallerIdentity, scope: &str) -> String {
    format!("{}|{}|{}", identity.org_id, identity.user_id, scope)
}

/// Cache entry with TTL
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Resolved scope
    value: String,
    /// Timestamp when entry was created
    created_at: Instant,
    /// Time-to-live duration
    ttl: Duration,
}

impl CacheEntry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// Statistics about cache performance
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of expired entries encountered
    pub expirations: usize,
    /// Total number of entries in cache
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// In-memory TTL cache backed by `DashMap`
///
/// # Examples
///
/// ```
/// use accesscontrol::scope::{ResolutionCache, TtlCache};
/// use std::time::Duration;
///
/// let cache = TtlCache::new();
/// cache.set("1|42|datasources:name:influx", "datasources:id:7".to_string(), Duration::from_secs(30));
/// assert_eq!(cache.get("1|42|datasources:name:influx").as_deref(), Some("datasources:id:7"));
/// ```
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
    stats: DashMap<String, usize>,
}

impl TtlCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            stats: DashMap::new(),
        }
    }

    /// Returns cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.get_stat("hits"),
            misses: self.get_stat("misses"),
            expirations: self.get_stat("expirations"),
            entries: self.entries.len(),
        }
    }

    /// Resets cache statistics
    pub fn reset_stats(&self) {
        self.stats.clear();
    }

    /// Spawns a janitor sweeping this cache every `interval`
    pub fn spawn_janitor(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        spawn_janitor(self, interval)
    }

    fn increment_stat(&self, key: &str) {
        self.stats
            .entry(key.to_string())
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    fn get_stat(&self, key: &str) -> usize {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionCache for TtlCache {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                // Release the shard guard before removing
                drop(entry);
                self.entries.remove_if(key, |_, entry| entry.is_expired());
                self.increment_stat("expirations");
                self.increment_stat("misses");
                return None;
            }

            self.increment_stat("hits");
            return Some(entry.value.clone());
        }

        self.increment_stat("misses");
        None
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        self.entries.insert(key.to_string(), CacheEntry::new(value, ttl));
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&self) {
        self.entries.clear();
        self.stats.clear();
    }

    fn cleanup_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before.saturating_sub(self.entries.len())
    }
}
