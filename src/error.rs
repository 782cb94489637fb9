//! Error types for FlashCache
//!
//! Reads and writes are total, so the only failures are configuration
//! mistakes caught when a cache is constructed.

use thiserror::Error;

/// Errors returned when building a cache.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// A cache needs at least one shard to route keys to.
    #[error("shard count must be at least 1")]
    ZeroShards,

    /// The sweep interval must be a non-zero duration.
    #[error("sweep interval must be greater than zero")]
    ZeroSweepInterval,

    /// Expiry sweepers are tokio tasks and need a runtime to live on.
    #[error("no tokio runtime available to run the expiry sweepers")]
    NoRuntime,
}

/// Convenience Result type for FlashCache.
pub type Result<T> = std::result::Result<T, CacheError>;
