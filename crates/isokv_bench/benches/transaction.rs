//! Transaction benchmarks per isolation level.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use isokv_bench::{generate_keys, populated_db, random_value};
use isokv_core::{CoreResult, Database, IsolationLevel};

/// Benchmark a single-key commit at every level.
fn bench_single_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_commit");

    for level in IsolationLevel::ALL {
        group.bench_function(BenchmarkId::from_parameter(level), |b| {
            let db: Database<String> = Database::new();
            let value = random_value(64);

            b.iter(|| {
                let txn = db.begin(level);
                txn.set("key", black_box(value.clone())).unwrap();
                txn.commit().unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark commits of growing batches.
fn bench_batch_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_commit");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let db: Database<String> = Database::new();
            let keys = generate_keys(size);
            let value = random_value(64);

            b.iter(|| {
                let txn = db.begin(IsolationLevel::ReadCommitted);
                for key in &keys {
                    txn.set(key.as_str(), value.clone()).unwrap();
                }
                txn.commit().unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark repeated reads of one key at every level.
fn bench_repeated_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("repeated_get");
    let db = populated_db(1000, 64);

    for level in IsolationLevel::ALL {
        group.bench_function(BenchmarkId::from_parameter(level), |b| {
            let txn = db.begin(level);
            b.iter(|| {
                let value = txn.get(black_box("key00000500")).unwrap();
                black_box(value);
            });
            txn.rollback().unwrap();
        });
    }
    group.finish();
}

/// Benchmark dirty reads with many concurrent open writers.
fn bench_dirty_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("dirty_read");

    for writers in [1, 16, 128].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(writers),
            writers,
            |b, &writers| {
                let db = populated_db(100, 64);
                let open: Vec<_> = (0..writers)
                    .map(|i| {
                        let txn = db.begin(IsolationLevel::ReadCommitted);
                        txn.set(format!("pending{i}"), random_value(16)).unwrap();
                        txn
                    })
                    .collect();
                let reader = db.begin(IsolationLevel::ReadUncommitted);

                b.iter(|| {
                    let value = reader.get(black_box("key00000050")).unwrap();
                    black_box(value);
                });

                drop(reader);
                drop(open);
            },
        );
    }
    group.finish();
}

/// Benchmark ranging over the committed store.
fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range");

    for size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let db = populated_db(size, 32);

            b.iter(|| {
                let txn = db.begin(IsolationLevel::ReadCommitted);
                let mut count = 0usize;
                txn.range(|_, v| -> CoreResult<()> {
                    count += v.len();
                    Ok(())
                })
                .unwrap();
                black_box(count);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_single_commit,
    bench_batch_commit,
    bench_repeated_get,
    bench_dirty_read,
    bench_range,
);

criterion_main!(benches);
