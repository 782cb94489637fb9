//! Storage Module
//!
//! The sharded cache engine and its parts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ShardedCache<T>                         │
//! │                          │                                  │
//! │                     Partitioner (FNV-1a % N)                │
//! │                          │                                  │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │ Shard N │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ RwLock  │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │
//!              ┌─────────────┴─────────────┐
//!              │     ExpirySweeper         │
//!              │ (one Tokio task per shard)│
//!              └───────────────────────────┘
//! ```

pub mod engine;
pub(crate) mod expiry;
pub mod partition;
mod shard;

// Re-export commonly used types
pub use engine::ShardedCache;
pub use partition::{fnv1a_32, Partitioner};
