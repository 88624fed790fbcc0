use crate::policy::{CachePolicy, EntryMeta};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
    last_accessed: Instant,
    access_count: u64,
    size_hint: usize,
}

/// TTL and priority-aware cache layer (spec §4.9, component C11). The
/// reference implementation is a single in-memory tier; a persistent
/// backend is pluggable behind the same operations.
pub struct Cache<K, V> {
    entries: HashMap<K, Entry<V>>,
    policy: CachePolicy,
    total_size: usize,
}

impl<K: Eq + Hash + Clone, V> Cache<K, V> {
    pub fn new(policy: CachePolicy) -> Self {
        Self { entries: HashMap::new(), policy, total_size: 0 }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &Entry<V>) -> bool {
        entry.inserted_at.elapsed() > self.policy.max_age
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.entries.get(key).is_some_and(|e| self.is_expired(e)) {
            self.remove_internal(key);
            return None;
        }
        let entry = self.entries.get_mut(key)?;
        entry.last_accessed = Instant::now();
        entry.access_count += 1;
        Some(&entry.value)
    }

    pub fn has(&mut self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn set(&mut self, key: K, value: V, size_hint: usize) {
        if let Some(old) = self.entries.remove(&key) {
            self.total_size -= old.size_hint;
        }
        let now = Instant::now();
        self.entries.insert(key, Entry { value, inserted_at: now, last_accessed: now, access_count: 0, size_hint });
        self.total_size += size_hint;
        self.enforce_policy();
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.remove_internal(key)
    }

    fn remove_internal(&mut self, key: &K) -> bool {
        if let Some(entry) = self.entries.remove(key) {
            self.total_size -= entry.size_hint;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_size = 0;
    }

    /// No-op placeholder hook for probable-key preloading; the reference
    /// in-memory tier has no upstream source to prefetch from. A pluggable
    /// backend overrides this to warm entries ahead of access.
    pub fn preload_probable(&self, _keys: &[K]) {}

    fn priority_of(&self, entry: &Entry<V>) -> f64 {
        let meta = EntryMeta {
            age_secs: entry.inserted_at.elapsed().as_secs_f64(),
            access_count: entry.access_count,
            size_hint: entry.size_hint,
        };
        (self.policy.priority_function)(&meta)
    }

    fn enforce_policy(&mut self) {
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| self.is_expired(entry))
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            self.remove_internal(&key);
        }

        while self.entries.len() > self.policy.max_items || self.total_size > self.policy.max_size {
            let Some(worst_key) = self.lowest_priority_key() else { break };
            self.remove_internal(&worst_key);
        }
    }

    fn lowest_priority_key(&self) -> Option<K> {
        self.entries
            .iter()
            .min_by(|(_, a), (_, b)| {
                self.priority_of(a).partial_cmp(&self.priority_of(b)).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(key, _)| key.clone())
    }

    /// Drops the bottom half of entries by priority (spec §4.9's
    /// `evictUnlikely`), from this tier only.
    pub fn evict_unlikely(&mut self) {
        let mut ranked: Vec<(K, f64)> =
            self.entries.iter().map(|(key, entry)| (key.clone(), self.priority_of(entry))).collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let drop_count = ranked.len() / 2;
        for (key, _) in ranked.into_iter().take(drop_count) {
            self.remove_internal(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn set_then_get_round_trips() {
        let mut cache: Cache<String, i32> = Cache::new(CachePolicy::default());
        cache.set("a".to_string(), 1, 10);
        assert_eq!(cache.get(&"a".to_string()), Some(&1));
    }

    #[test]
    fn delete_removes_entry() {
        let mut cache: Cache<String, i32> = Cache::new(CachePolicy::default());
        cache.set("a".to_string(), 1, 10);
        cache.delete(&"a".to_string());
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache: Cache<String, i32> = Cache::new(CachePolicy::default());
        cache.set("a".to_string(), 1, 10);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entries_are_not_returned() {
        let policy = CachePolicy { max_age: Duration::from_millis(1), ..CachePolicy::default() };
        let mut cache: Cache<String, i32> = Cache::new(policy);
        cache.set("a".to_string(), 1, 10);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn max_items_cap_is_enforced_after_set() {
        let policy = CachePolicy { max_items: 2, ..CachePolicy::default() };
        let mut cache: Cache<String, i32> = Cache::new(policy);
        cache.set("a".to_string(), 1, 1);
        cache.set("b".to_string(), 2, 1);
        cache.set("c".to_string(), 3, 1);
        assert!(cache.len() <= 2);
    }

    #[test]
    fn evict_unlikely_drops_bottom_half() {
        let mut cache: Cache<String, i32> = Cache::new(CachePolicy::default());
        for i in 0..4 {
            cache.set(format!("k{i}"), i, 1);
        }
        cache.evict_unlikely();
        assert_eq!(cache.len(), 2);
    }
}
