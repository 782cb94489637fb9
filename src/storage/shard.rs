//! Shard Store
//!
//! A shard is one independent slice of the key space: a `HashMap` behind its
//! own `RwLock`. Reads take the shared lock, writes and sweeps take the
//! exclusive lock. No code path ever holds two shard locks at once.
//!
//! Lookups do not check expiry. An entry past its TTL stays visible until
//! the next sweep of its shard removes it.

use std::collections::hash_map::{self, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// One cached value together with its expiry bookkeeping.
#[derive(Debug, Clone)]
pub(crate) struct Entry<T> {
    /// The value stored by the caller
    pub value: T,
    /// When the entry was inserted or last overwritten
    pub created_at: Instant,
    /// How long the entry lives after `created_at`
    pub ttl: Duration,
}

impl<T> Entry<T> {
    fn new(value: T, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            ttl,
        }
    }

    /// Replaces the value and restarts the expiry clock.
    fn overwrite(&mut self, value: T, ttl: Duration, now: Instant) {
        self.value = value;
        self.created_at = now;
        self.ttl = ttl;
    }

    /// An entry is expired once its age strictly exceeds its TTL.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.ttl
    }

    /// Time left before the entry becomes eligible for sweeping.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.ttl
            .saturating_sub(now.saturating_duration_since(self.created_at))
    }
}

/// A single shard containing a portion of the key-value pairs.
#[derive(Debug)]
pub(crate) struct Shard<T> {
    items: RwLock<HashMap<String, Entry<T>>>,
}

impl<T> Default for Shard<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Shard<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry<T>>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry<T>>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or overwrites `key`. Overwriting resets the expiry clock.
    pub fn set(&self, key: String, value: T, ttl: Duration) {
        let now = Instant::now();
        let mut items = self.write();

        match items.entry(key) {
            hash_map::Entry::Occupied(mut occupied) => {
                occupied.get_mut().overwrite(value, ttl, now);
            }
            hash_map::Entry::Vacant(vacant) => {
                vacant.insert(Entry::new(value, ttl, now));
            }
        }
    }

    /// Runs `f` against the stored value, if any, under the shared lock.
    pub fn get_with<R>(&self, key: &str, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.read().get(key).map(|entry| f(&entry.value))
    }

    /// Returns a clone of the stored value. Stale entries are still returned.
    pub fn get(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        self.get_with(key, T::clone)
    }

    /// Remaining TTL for `key`, or `None` if absent.
    pub fn ttl(&self, key: &str, now: Instant) -> Option<Duration> {
        self.read().get(key).map(|entry| entry.remaining_at(now))
    }

    /// Removes `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<T> {
        self.write().remove(key).map(|entry| entry.value)
    }

    /// Number of entries, including stale ones not yet swept.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Deletes every entry whose age exceeds its TTL as of `now`.
    ///
    /// # Returns
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let mut items = self.write();
        let before = items.len();

        items.retain(|_, entry| !entry.is_expired_at(now));

        before - items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let shard = Shard::new();
        shard.set("name".to_string(), "Ariz".to_string(), Duration::from_secs(60));
        assert_eq!(shard.get("name"), Some("Ariz".to_string()));
    }

    #[test]
    fn test_get_nonexistent() {
        let shard: Shard<u32> = Shard::new();
        assert_eq!(shard.get("missing"), None);
    }

    #[test]
    fn test_overwrite_replaces_value_and_ttl() {
        let shard = Shard::new();
        shard.set("key".to_string(), 1, Duration::from_millis(1));
        shard.set("key".to_string(), 2, Duration::from_secs(60));

        assert_eq!(shard.len(), 1);
        assert_eq!(shard.get("key"), Some(2));
        let remaining = shard.ttl("key", Instant::now()).unwrap();
        assert!(remaining > Duration::from_secs(59));
    }

    #[test]
    fn test_get_does_not_check_expiry() {
        let shard = Shard::new();
        shard.set("stale".to_string(), 7, Duration::ZERO);
        std::thread::sleep(Duration::from_millis(5));

        // Visible until a sweep removes it.
        assert_eq!(shard.get("stale"), Some(7));
        assert_eq!(shard.ttl("stale", Instant::now()), Some(Duration::ZERO));
    }

    #[test]
    fn test_sweep_expired() {
        let shard = Shard::new();
        shard.set("short1".to_string(), 1, Duration::from_millis(10));
        shard.set("short2".to_string(), 2, Duration::from_millis(10));
        shard.set("long".to_string(), 3, Duration::from_secs(60));

        // Nothing has aged yet.
        assert_eq!(shard.sweep_expired(Instant::now()), 0);

        let later = Instant::now() + Duration::from_millis(50);
        assert_eq!(shard.sweep_expired(later), 2);
        assert_eq!(shard.len(), 1);
        assert_eq!(shard.get("long"), Some(3));
    }

    #[test]
    fn test_expiry_is_strictly_greater_than_ttl() {
        let now = Instant::now();
        let entry = Entry::new((), Duration::from_secs(2), now);

        assert!(!entry.is_expired_at(now));
        assert!(!entry.is_expired_at(now + Duration::from_secs(2)));
        assert!(entry.is_expired_at(now + Duration::from_secs(2) + Duration::from_nanos(1)));
    }

    #[test]
    fn test_remove_and_clear() {
        let shard = Shard::new();
        shard.set("a".to_string(), 1, Duration::from_secs(60));
        shard.set("b".to_string(), 2, Duration::from_secs(60));

        assert_eq!(shard.remove("a"), Some(1));
        assert_eq!(shard.remove("a"), None);
        assert_eq!(shard.len(), 1);

        shard.clear();
        assert_eq!(shard.len(), 0);
    }

    #[test]
    fn test_get_with_borrows_value() {
        let shard = Shard::new();
        shard.set("vec".to_string(), vec![1, 2, 3], Duration::from_secs(60));
        assert_eq!(shard.get_with("vec", |v| v.len()), Some(3));
        assert_eq!(shard.get_with("nope", |v: &Vec<i32>| v.len()), None);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        use std::sync::Arc;
        use std::thread;

        let shard = Arc::new(Shard::new());
        let mut handles = vec![];

        for i in 0..8 {
            let shard = Arc::clone(&shard);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    let key = format!("key-{}-{}", i, j);
                    shard.set(key.clone(), j, Duration::from_secs(60));
                    assert_eq!(shard.get(&key), Some(j));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shard.len(), 800);
    }
}
