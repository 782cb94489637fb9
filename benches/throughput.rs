//! Throughput Benchmark for FlashCache
//!
//! This benchmark measures the performance of the sharded cache
//! under various workloads.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use flashcache::ShardedCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const TTL: Duration = Duration::from_secs(3600);

/// Builds a cache whose sweepers live on `rt`.
fn new_cache(rt: &Runtime, shards: usize) -> ShardedCache<Bytes> {
    let _guard = rt.enter();
    ShardedCache::new(shards, Duration::from_secs(1)).expect("valid cache config")
}

/// Benchmark SET operations
fn bench_set(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = new_cache(&rt, 64);

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_small", |b| {
        let mut i = 0u64;
        let value = Bytes::from("small_value");
        b.iter(|| {
            cache.set(format!("key:{}", i), value.clone(), TTL);
            i += 1;
        });
    });

    group.bench_function("overwrite", |b| {
        let mut i = 0u64;
        let value = Bytes::from("x".repeat(1024)); // 1KB value
        b.iter(|| {
            cache.set(format!("key:{}", i % 1000), value.clone(), TTL);
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark GET operations
fn bench_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = new_cache(&rt, 64);

    // Pre-populate with data
    for i in 0..100_000 {
        cache.set(format!("key:{}", i), Bytes::from(format!("value:{}", i)), TTL);
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            black_box(cache.get(&format!("key:{}", i % 100_000)));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            black_box(cache.get(&format!("missing:{}", i)));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark mixed workload (set then get, like the usual cache-aside loop)
fn bench_mixed(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = new_cache(&rt, 4);

    let mut group = c.benchmark_group("mixed");
    group.throughput(Throughput::Elements(2));

    group.bench_function("set_get_4_shards", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = i.to_string();
            cache.set(key.clone(), Bytes::from("value"), Duration::from_secs(2));
            black_box(cache.get(&key));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark concurrent access at different shard counts
fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("concurrent");
    group.measurement_time(Duration::from_secs(10));

    for shards in [1, 16] {
        group.bench_function(format!("4_threads_{}_shards", shards), |b| {
            b.iter(|| {
                let cache = Arc::new(new_cache(&rt, shards));
                let handles: Vec<_> = (0..4)
                    .map(|t| {
                        let cache = Arc::clone(&cache);
                        thread::spawn(move || {
                            for i in 0..10_000 {
                                let key = format!("key:{}:{}", t, i);
                                cache.set(key.clone(), Bytes::from("value"), TTL);
                                cache.get(&key);
                            }
                        })
                    })
                    .collect();

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(cache.len());
            });
        });
    }

    group.finish();
}

/// Benchmark a full sweep over expired entries
fn bench_sweep(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = new_cache(&rt, 64);

    let mut group = c.benchmark_group("sweep");

    group.bench_function("purge_10k_expired", |b| {
        b.iter(|| {
            for i in 0..10_000 {
                cache.set(format!("key:{}", i), Bytes::from("value"), Duration::ZERO);
            }
            std::thread::sleep(Duration::from_millis(1));
            black_box(cache.purge_expired());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_get,
    bench_mixed,
    bench_concurrent,
    bench_sweep,
);

criterion_main!(benches);
