//! In-memory cache with TTL support.
//!
//! Eviction is lazy: an expired entry is removed when a read finds it, plus
//! an explicit `cleanup_expired` sweep. No background thread.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Build a deterministic cache key from its parts: lowercase, trim, join
/// with `:`, then SHA-256 hex. Order-sensitive; case- and
/// whitespace-insensitive per part. Pure function of its inputs.
pub fn cache_key(parts: &[&str]) -> String {
    let normalized: Vec<String> = parts
        .iter()
        .map(|part| part.to_lowercase().trim().to_string())
        .collect();
    let digest = Sha256::digest(normalized.join(":").as_bytes());
    hex::encode(digest)
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub default_ttl_hours: f64,
}

struct Entry<T> {
    value: T,
    #[allow(dead_code)]
    created_at: Instant,
    expires_at: Instant,
}

pub struct TtlCache<T: Clone> {
    entries: RwLock<HashMap<String, Entry<T>>>,
    default_ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(default_ttl_hours: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl: Duration::from_secs(default_ttl_hours * 3600),
        }
    }

    /// Get a value if present and not expired. A read that finds an expired
    /// entry also evicts it.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        {
            let entries = self.entries.read().expect("cache lock poisoned");
            match entries.get(key) {
                None => return None,
                Some(entry) if now <= entry.expires_at => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Expired: re-check under the write lock (a concurrent set may have
        // refreshed the entry) and evict.
        let mut entries = self.entries.write().expect("cache lock poisoned");
        if let Some(entry) = entries.get(key) {
            if now <= entry.expires_at {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        None
    }

    /// Upsert with the default TTL. Overwrites silently; last write wins.
    pub fn set(&self, key: &str, value: T) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: &str, value: T, ttl: Duration) {
        let now = Instant::now();
        let entry = Entry {
            value,
            created_at: now,
            expires_at: now + ttl,
        };
        self.entries
            .write()
            .expect("cache lock poisoned")
            .insert(key.to_string(), entry);
    }

    /// Remove a key. Returns true iff it existed before the call.
    pub fn delete(&self, key: &str) -> bool {
        self.entries
            .write()
            .expect("cache lock poisoned")
            .remove(key)
            .is_some()
    }

    /// Remove everything; returns the number of entries removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        let count = entries.len();
        entries.clear();
        count
    }

    /// Read-only accounting; never evicts.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read().expect("cache lock poisoned");
        let valid_entries = entries.values().filter(|e| now < e.expires_at).count();
        CacheStats {
            total_entries: entries.len(),
            valid_entries,
            expired_entries: entries.len() - valid_entries,
            default_ttl_hours: self.default_ttl.as_secs_f64() / 3600.0,
        }
    }

    /// Eagerly sweep all expired entries; returns the number removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, e| now <= e.expires_at);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let cache = TtlCache::new(24);
        cache.set("k", 42);
        assert_eq!(cache.get("k"), Some(42));
    }

    #[test]
    fn expired_read_returns_absent_and_evicts() {
        let cache = TtlCache::new(24);
        cache.set_with_ttl("k", 1, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(cache.stats().total_entries, 1);
        assert_eq!(cache.get("k"), None);
        // Lazy eviction: the failed read removed the entry
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn delete_reports_prior_existence() {
        let cache = TtlCache::new(24);
        cache.set("k", 1);
        assert!(cache.delete("k"));
        assert!(!cache.delete("k"));
    }

    #[test]
    fn clear_returns_removed_count() {
        let cache = TtlCache::new(24);
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.clear(), 2);
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn stats_counts_expired_without_evicting() {
        let cache = TtlCache::new(24);
        cache.set("fresh", 1);
        cache.set_with_ttl("stale", 2, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.valid_entries, 1);
        assert_eq!(stats.expired_entries, 1);
        // stats is read-only
        assert_eq!(cache.stats().total_entries, 2);
    }

    #[test]
    fn cleanup_expired_sweeps_eagerly() {
        let cache = TtlCache::new(24);
        cache.set("fresh", 1);
        cache.set_with_ttl("stale", 2, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.stats().total_entries, 1);
        assert_eq!(cache.get("fresh"), Some(1));
    }

    #[test]
    fn overwrite_is_silent_last_write_wins() {
        let cache = TtlCache::new(24);
        cache.set("k", 1);
        cache.set("k", 2);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.stats().total_entries, 1);
    }

    #[test]
    fn key_is_case_and_whitespace_insensitive() {
        assert_eq!(
            cache_key(&["politician", "Modi"]),
            cache_key(&["politician", " MODI "])
        );
    }

    #[test]
    fn key_is_order_sensitive() {
        assert_ne!(cache_key(&["a", "b"]), cache_key(&["b", "a"]));
    }

    #[test]
    fn key_is_stable_across_calls() {
        assert_eq!(
            cache_key(&["compare", "A", "B"]),
            cache_key(&["compare", "A", "B"])
        );
    }

    #[test]
    fn concurrent_sets_on_same_key_do_not_corrupt() {
        use std::sync::Arc;

        let cache = Arc::new(TtlCache::new(24));
        let mut handles = Vec::new();
        for i in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    cache.set("shared", i);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let value = cache.get("shared").unwrap();
        assert!((0..8).contains(&value));
        assert_eq!(cache.stats().total_entries, 1);
    }
}
