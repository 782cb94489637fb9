//! # FlashCache - A Sharded In-Process TTL Cache
//!
//! FlashCache caches values of one type `T` behind string keys, each with
//! its own time-to-live. Keys are spread over independent shards so that
//! threads working on different keys rarely touch the same lock.
//!
//! ## Features
//!
//! - **Sharded Storage**: Each shard is a `HashMap` behind its own `RwLock`
//! - **Deterministic Routing**: 32-bit FNV-1a hash modulo the shard count
//! - **Per-Entry TTL**: Every `set` carries its own TTL; overwriting restarts it
//! - **Background Expiry**: One Tokio task per shard sweeps expired entries
//!
//! ## Quick Start
//!
//! ```
//! use flashcache::ShardedCache;
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> flashcache::Result<()> {
//!     let cache = ShardedCache::new(4, Duration::from_secs(1))?;
//!
//!     cache.set("foo", "bar", Duration::from_secs(2));
//!     assert_eq!(cache.get("foo"), Some("bar"));
//!
//!     // Halt background eviction; reads and writes keep working.
//!     cache.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Expiry Semantics
//!
//! An entry is expired once `now - created_at > ttl`, and only a sweep
//! removes it. `get` does not check expiry, so an entry can be read for up
//! to one sweep interval past its TTL. Once the sweepers are stopped, stale
//! entries stay readable until removed or purged by hand.
//!
//! ## Module Overview
//!
//! - [`storage`]: Partitioner, shards, the cache facade and the sweepers
//! - [`config`]: Construction parameters
//! - [`error`]: Construction errors

pub mod config;
pub mod error;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::{CacheConfig, DEFAULT_SHARDS, DEFAULT_SWEEP_INTERVAL};
pub use error::{CacheError, Result};
pub use storage::{Partitioner, ShardedCache};

/// Version of FlashCache
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
