//! Cache Configuration
//!
//! Both settings are fixed for the lifetime of a cache instance.

use crate::error::{CacheError, Result};
use std::time::Duration;

/// Default number of shards.
/// More shards = less lock contention, but more sweeper tasks.
pub const DEFAULT_SHARDS: usize = 64;

/// Default interval between expiry sweeps of a shard.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Construction parameters for a [`ShardedCache`](crate::ShardedCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Number of independent shards (must be at least 1)
    pub num_shards: usize,

    /// How often each shard's sweeper wakes to drop expired entries
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            num_shards: DEFAULT_SHARDS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl CacheConfig {
    /// Sets the shard count.
    pub fn with_shards(mut self, num_shards: usize) -> Self {
        self.num_shards = num_shards;
        self
    }

    /// Sets the sweep interval.
    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    /// Checks that the configuration can back a cache.
    pub fn validate(&self) -> Result<()> {
        if self.num_shards == 0 {
            return Err(CacheError::ZeroShards);
        }
        if self.sweep_interval.is_zero() {
            return Err(CacheError::ZeroSweepInterval);
        }
        Ok(())
    }
}
