//! TTL cache for extraction results
//!
//! Entries expire lazily: a read past the deadline evicts the entry and
//! reports a miss. All per-key operations go through `DashMap`'s sharded
//! locks, so concurrent readers of one key never observe a torn write and
//! traffic on other keys is never blocked.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    payload: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.inserted_at) >= self.ttl
    }
}

/// Concurrent result cache with a per-entry time-to-live.
///
/// Keys are typed by the caller, which keeps distinct operations (listing
/// page 2 vs. searching "naruto") from ever colliding by string accident.
#[derive(Debug)]
pub struct ResultCache<K: Eq + Hash, V> {
    entries: DashMap<K, CacheEntry<V>>,
    default_ttl: Duration,
}

impl<K, V> ResultCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// Fresh payload for `key`, or `None` on a miss or an expired entry.
    /// Expired entries are evicted on the way out.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.payload.clone());
            }
        } else {
            return None;
        }

        // Read guard is released above. Re-check expiry during removal so a
        // racing fresh insert is not thrown away.
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Store `payload` under `key` with the cache-wide default TTL,
    /// replacing any previous entry and restarting its clock.
    pub fn insert(&self, key: K, payload: V) {
        self.insert_with_ttl(key, payload, self.default_ttl);
    }

    /// Store `payload` with an explicit TTL. A zero TTL means the entry is
    /// already stale and will never be served.
    pub fn insert_with_ttl(&self, key: K, payload: V, ttl: Duration) {
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Drop every expired entry. Expiry is otherwise lazy, so long-idle
    /// deployments can call this periodically to bound memory.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
