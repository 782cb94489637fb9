//! Key Partitioning
//!
//! Maps a key to the shard that owns it. The mapping must be pure: a key
//! that landed in shard 3 on `set` has to be looked up in shard 3 on `get`,
//! under the same lock, for as long as the cache lives.
//!
//! We use 32-bit FNV-1a rather than `DefaultHasher` because its output is
//! fixed across processes and Rust versions, so shard placement is
//! reproducible.

use std::num::NonZeroUsize;

/// FNV-1a 32-bit offset basis
const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime
const FNV_PRIME: u32 = 16_777_619;

/// Computes the 32-bit FNV-1a hash of a byte sequence.
#[inline]
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Routes keys to shard indices in `[0, num_shards)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    num_shards: NonZeroUsize,
}

impl Partitioner {
    /// Creates a partitioner over `num_shards` shards.
    pub fn new(num_shards: NonZeroUsize) -> Self {
        Self { num_shards }
    }

    /// Number of shards keys are spread across.
    pub fn num_shards(&self) -> usize {
        self.num_shards.get()
    }

    /// Determines which shard a key belongs to.
    #[inline]
    pub fn shard_index(&self, key: &str) -> usize {
        // Reduce in u64 space: no shard count a usize can hold truncates, and
        // the result does not depend on pointer width.
        (u64::from(fnv1a_32(key.as_bytes())) % self.num_shards.get() as u64) as usize
    }
}
