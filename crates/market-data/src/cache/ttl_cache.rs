//! Time-to-live cache for immutable pipeline results.
//!
//! Entries expire a fixed duration after insertion regardless of how often
//! they are read. Values are handed out as `Arc`s and replaced wholesale on
//! refresh, so a reader sees either a complete entry or none.
//!
//! Storage and eviction are handled by `moka`, which also bounds the entry
//! count and drops stale entries in the background. Freshness itself is
//! decided against the injected [`Clock`] so expiry is deterministic under
//! test.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use moka::sync::Cache;

use super::clock::Clock;

/// Upper bound on cached keys. The snapshot cache holds one key per request
/// shape and the history cache one per mapped symbol.
const DEFAULT_MAX_ENTRIES: u64 = 1024;
/// `moka` rejects very long lifetimes.
const MAX_EVICTION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

struct CacheEntry<V> {
    value: Arc<V>,
    inserted_at: DateTime<Utc>,
}

impl<V> Clone for CacheEntry<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            inserted_at: self.inserted_at,
        }
    }
}

pub struct TtlCache<V> {
    entries: Cache<String, CacheEntry<V>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl<V: Send + Sync + 'static> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let entries = Cache::builder()
            .max_capacity(DEFAULT_MAX_ENTRIES)
            .time_to_live(ttl.min(MAX_EVICTION_TTL))
            .build();
        Self {
            entries,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.inserted_at) < self.ttl
    }

    /// Fresh value for `key`, if any. Expired entries are dropped.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let now = self.clock.now();
        let entry = self.entries.get(key)?;
        if self.is_fresh(&entry, now) {
            debug!("Cache hit for {}", key);
            return Some(entry.value);
        }

        debug!("Cache entry for {} expired", key);
        self.entries.invalidate(key);
        None
    }

    /// Insert or replace the value for `key`, returning the shared handle.
    pub fn put(&self, key: impl Into<String>, value: V) -> Arc<V> {
        let value = Arc::new(value);
        let entry = CacheEntry {
            value: Arc::clone(&value),
            inserted_at: self.clock.now(),
        };
        self.entries.insert(key.into(), entry);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn cache(clock: &Arc<ManualClock>) -> TtlCache<String> {
        TtlCache::new(Duration::from_secs(300), clock.clone())
    }

    #[test]
    fn test_get_missing() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        assert!(cache(&clock).get("nope").is_none());
    }

    #[test]
    fn test_entry_fresh_until_ttl() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache(&clock);
        let stored = cache.put("k", "v".to_string());

        clock.advance(TimeDelta::seconds(299));
        let hit = cache.get("k").unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));

        clock.advance(TimeDelta::seconds(1));
        assert!(cache.get("k").is_none());
        assert!(cache.entries.get("k").is_none());
    }

    #[test]
    fn test_reads_do_not_extend_lifetime() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache(&clock);
        cache.put("k", "v".to_string());

        for _ in 0..5 {
            clock.advance(TimeDelta::seconds(60));
            cache.get("k");
        }
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_put_replaces_entry() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache(&clock);
        let first = cache.put("k", "old".to_string());

        clock.advance(TimeDelta::seconds(200));
        cache.put("k", "new".to_string());
        assert_eq!(*first, "old");

        clock.advance(TimeDelta::seconds(200));
        assert_eq!(cache.get("k").as_deref(), Some(&"new".to_string()));
    }

    #[test]
    fn test_keys_are_independent() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache(&clock);
        cache.put("a", "1".to_string());
        clock.advance(TimeDelta::seconds(250));
        cache.put("b", "2".to_string());
        clock.advance(TimeDelta::seconds(100));

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn test_entry_count_is_bounded() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache(&clock);
        for i in 0..(DEFAULT_MAX_ENTRIES + 200) {
            cache.put(format!("k{}", i), i.to_string());
        }
        cache.entries.run_pending_tasks();
        assert!(cache.entries.entry_count() <= DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn test_huge_ttl_is_accepted() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = TtlCache::new(Duration::from_secs(u64::MAX), clock.clone());
        cache.put("k", 1u32);
        clock.advance(TimeDelta::days(3650));
        assert_eq!(cache.get("k").as_deref(), Some(&1));
    }
}
