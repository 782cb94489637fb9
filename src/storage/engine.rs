//! Sharded Cache Engine
//!
//! This module implements the cache facade for FlashCache. It owns a fixed
//! array of shards, routes every key through the [`Partitioner`], and keeps
//! one background sweeper per shard alive until it is stopped.
//!
//! ## Design Decisions
//!
//! 1. **Sharded Locks**: Instead of one big lock, every shard has its own `RwLock`.
//! 2. **Lazy Reads**: `get` never checks expiry; stale entries are hits until swept.
//! 3. **Per-Shard Sweepers**: Each shard is swept by its own Tokio task.
//! 4. **Unbounded**: There is no entry limit; only TTL retires entries.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ShardedCache<T>                         │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │ Shard N │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ RwLock  │           │
//! │  │ HashMap │ │ HashMap │ │ HashMap │ │ HashMap │           │
//! │  └────▲────┘ └────▲────┘ └────▲────┘ └────▲────┘           │
//! │       │ sweep     │ sweep     │ sweep     │ sweep          │
//! │   task 0      task 1      task 2      task N               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations on keys in different shards never contend. Within a shard,
//! writes and sweeps are exclusive and reads run concurrently.

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::storage::expiry::ExpirySweeper;
use crate::storage::partition::Partitioner;
use crate::storage::shard::Shard;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::info;

/// A generic key/value cache with per-entry TTL, split into independent shards.
///
/// # Thread Safety
///
/// `get` and `set` are synchronous and can be called from any thread. The
/// cache can be shared with an `Arc`.
///
/// # Runtime
///
/// Construction spawns the expiry sweepers on the current Tokio runtime, so
/// it must happen inside one.
///
/// # Example
///
/// ```
/// use flashcache::ShardedCache;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> flashcache::Result<()> {
/// let cache = ShardedCache::new(4, Duration::from_secs(1))?;
///
/// cache.set("name", "Ariz".to_string(), Duration::from_secs(60));
/// assert_eq!(cache.get("name"), Some("Ariz".to_string()));
/// assert_eq!(cache.get("missing"), None);
///
/// cache.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct ShardedCache<T> {
    /// The shards, shared with the sweeper tasks
    shards: Arc<[Shard<T>]>,

    /// Key to shard routing
    partitioner: Partitioner,

    /// Interval between sweeps of a shard
    sweep_interval: Duration,

    /// Background sweepers, stopped on `stop` or drop
    sweeper: ExpirySweeper,
}

impl<T> std::fmt::Debug for ShardedCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedCache")
            .field("shards", &self.shards.len())
            .field("sweep_interval", &self.sweep_interval)
            .field("stopped", &self.sweeper.is_stopped())
            .finish()
    }
}

impl<T> ShardedCache<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a cache with `num_shards` shards swept every `sweep_interval`.
    ///
    /// Background sweeping starts immediately.
    ///
    /// # Errors
    ///
    /// Fails with [`CacheError::ZeroShards`] or [`CacheError::ZeroSweepInterval`]
    /// on invalid arguments, and [`CacheError::NoRuntime`] outside a Tokio runtime.
    pub fn new(num_shards: usize, sweep_interval: Duration) -> Result<Self> {
        Self::with_config(CacheConfig {
            num_shards,
            sweep_interval,
        })
    }

    /// Creates a cache from a [`CacheConfig`].
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
        let num_shards = NonZeroUsize::new(config.num_shards).ok_or(CacheError::ZeroShards)?;

        let shards: Arc<[Shard<T>]> = (0..num_shards.get()).map(|_| Shard::new()).collect();
        let sweeper = ExpirySweeper::start(Arc::clone(&shards), config.sweep_interval, &runtime);

        info!(
            shards = num_shards.get(),
            sweep_interval_ms = config.sweep_interval.as_millis(),
            "Cache initialized"
        );

        Ok(Self {
            shards,
            partitioner: Partitioner::new(num_shards),
            sweep_interval: config.sweep_interval,
            sweeper,
        })
    }
}

impl<T> ShardedCache<T> {
    /// Gets the shard for a given key.
    #[inline]
    fn shard(&self, key: &str) -> &Shard<T> {
        &self.shards[self.partitioner.shard_index(key)]
    }

    /// Stores `value` under `key` for `ttl`.
    ///
    /// If the key already exists its value and TTL are replaced and its
    /// expiry clock restarts.
    pub fn set(&self, key: impl Into<String>, value: T, ttl: Duration) {
        let key = key.into();
        self.shard(&key).set(key, value, ttl);
    }

    /// Gets a clone of the value for a key.
    ///
    /// Expiry is not checked here: an entry whose TTL has passed is still
    /// returned until the next sweep of its shard removes it.
    pub fn get(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        self.shard(key).get(key)
    }

    /// Runs `f` against the value for a key without cloning it.
    ///
    /// The owning shard's read lock is held while `f` runs.
    pub fn get_with<R>(&self, key: &str, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.shard(key).get_with(key, f)
    }

    /// Returns true if the key is present (stale entries included).
    pub fn contains_key(&self, key: &str) -> bool {
        self.get_with(key, |_| ()).is_some()
    }

    /// Returns how long the entry has left before a sweep may remove it.
    ///
    /// Entries that are past their TTL but not yet swept report zero.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.shard(key).ttl(key, Instant::now())
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&self, key: &str) -> Option<T> {
        self.shard(key).remove(key)
    }

    /// Returns the number of entries across all shards.
    ///
    /// Shards are counted one at a time, so concurrent writes may make this
    /// slightly stale.
    pub fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    /// Returns true if no shard holds an entry.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.len() == 0)
    }

    /// Clears all entries, shard by shard.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.clear();
        }
    }

    /// Sweeps every shard right now.
    ///
    /// This works whether or not background sweeping has been stopped.
    ///
    /// # Returns
    ///
    /// Returns the number of entries that were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        self.shards.iter().map(|shard| shard.sweep_expired(now)).sum()
    }

    /// Number of shards, fixed at construction.
    pub fn shard_count(&self) -> usize {
        self.partitioner.num_shards()
    }

    /// Interval between background sweeps, fixed at construction.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Shard a key is routed to.
    pub fn shard_index(&self, key: &str) -> usize {
        self.partitioner.shard_index(key)
    }

    /// Halts background eviction. Reads and writes keep working.
    ///
    /// Calling this more than once is harmless.
    pub fn stop(&self) {
        self.sweeper.stop();
    }

    /// Returns true once background eviction has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.sweeper.is_stopped()
    }

    /// Stops background eviction and waits for every sweeper task to exit.
    pub async fn shutdown(&self) {
        self.sweeper.join().await;
    }
}
