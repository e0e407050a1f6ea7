//! In-memory store benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use isokv_bench::{generate_keys, random_value};
use isokv_storage::{InMemoryStore, KvStore};

/// Benchmark set operations.
fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_set");

    for size in [16, 256, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let store = InMemoryStore::new();
            let value = random_value(size);

            b.iter(|| {
                store.set("key".to_string(), black_box(value.clone())).unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark get operations on a populated store.
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_get");

    for count in [100, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let store = InMemoryStore::with_entries(
                generate_keys(count)
                    .into_iter()
                    .map(|k| (k, random_value(32))),
            );

            b.iter(|| {
                let value = store.get(black_box("key00000042")).unwrap();
                black_box(value);
            });
        });
    }
    group.finish();
}

/// Benchmark snapshotting every pair.
fn bench_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_pairs");

    for count in [100, 10000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let store = InMemoryStore::with_entries(
                generate_keys(count)
                    .into_iter()
                    .map(|k| (k, random_value(32))),
            );

            b.iter(|| {
                let pairs = store.pairs();
                black_box(pairs);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_set, bench_get, bench_pairs);

criterion_main!(benches);
