//! Stress tests for IsoKV.
//!
//! These helpers drive a database from many threads at once and report
//! what happened.

use isokv_core::{CoreResult, Database, IsolationLevel};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Transactions per thread.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Number of distinct keys.
    pub key_count: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 1_000,
            threads: 4,
            key_count: 64,
        }
    }
}

/// Key holding the shared counter in [`stress_serializable_counter`].
pub const COUNTER_KEY: &str = "counter";

/// Increments one counter from every thread in serializable transactions.
///
/// Returns the run summary and the final committed counter, which must
/// equal `successful_ops` when no update is lost.
pub fn stress_serializable_counter(
    db: &Database<u64>,
    config: &StressConfig,
) -> (StressTestResult, u64) {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(config.threads));

    let start = Instant::now();
    let handles: Vec<_> = (0..config.threads)
        .map(|_| {
            let db = db.clone();
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let barrier = Arc::clone(&barrier);
            let operations = config.operations;

            thread::spawn(move || {
                barrier.wait();
                for _ in 0..operations {
                    match increment(&db, COUNTER_KEY) {
                        Ok(()) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("stress thread panicked");
    }
    let duration = start.elapsed();

    let total = db
        .begin(IsolationLevel::ReadCommitted)
        .get(COUNTER_KEY)
        .unwrap_or(0);

    (
        StressTestResult::new(
            successful.load(Ordering::Relaxed),
            failed.load(Ordering::Relaxed),
            duration,
        ),
        total,
    )
}

/// Runs writers and readers at every isolation level concurrently.
///
/// Each thread picks its level round-robin; writers overwrite random-ish
/// keys, readers read them back. Only unexpected errors count as failures:
/// `NotFound` is a normal outcome for a key nobody has written yet.
pub fn stress_mixed_levels(db: &Database<String>, config: &StressConfig) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();
    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let db = db.clone();
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let level = IsolationLevel::ALL[t % IsolationLevel::ALL.len()];
            let operations = config.operations;
            let key_count = config.key_count.max(1);

            thread::spawn(move || {
                for i in 0..operations {
                    let key = format!("key{}", (i * 7 + t) % key_count);
                    let result = db.transaction(level, |txn| {
                        match txn.get(&key) {
                            Ok(_) => {}
                            Err(err) if err.is_not_found() => {}
                            Err(err) => return Err(err),
                        }
                        if i % 3 == 0 {
                            txn.delete(&key)
                        } else {
                            txn.set(key.as_str(), format!("t{t}-{i}"))
                        }
                    });
                    match result {
                        Ok(()) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("stress thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

fn increment(db: &Database<u64>, key: &str) -> CoreResult<()> {
    db.transaction(IsolationLevel::Serializable, |txn| {
        let current = match txn.get(key) {
            Ok(n) => n,
            Err(err) if err.is_not_found() => 0,
            Err(err) => return Err(err),
        };
        txn.set(key, current + 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> StressConfig {
        StressConfig {
            operations: 200,
            threads: 4,
            key_count: 16,
        }
    }

    #[test]
    fn serializable_counter_loses_no_updates() {
        let db = Database::new();
        let config = small_config();
        let (result, total) = stress_serializable_counter(&db, &config);

        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.successful_ops, config.threads * config.operations);
        assert_eq!(total, (config.threads * config.operations) as u64);
        assert_eq!(db.active_count(), 0);
        assert_eq!(db.manager().serial_owner(), None);
    }

    #[test]
    fn mixed_levels_complete_without_errors() {
        let db = Database::new();
        let config = small_config();
        let result = stress_mixed_levels(&db, &config);

        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.total_ops, config.threads * config.operations);
        assert_eq!(db.active_count(), 0);
        assert!(db.committed_len().unwrap() <= config.key_count);
    }

    #[test]
    fn result_throughput() {
        let result = StressTestResult::new(90, 10, Duration::from_secs(2));
        assert_eq!(result.total_ops, 100);
        assert!((result.ops_per_second - 50.0).abs() < f64::EPSILON);

        let instant = StressTestResult::new(1, 0, Duration::ZERO);
        assert_eq!(instant.ops_per_second, 0.0);
    }
}
