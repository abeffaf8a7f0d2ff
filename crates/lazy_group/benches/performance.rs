// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Performance benchmarks for `lazy_group`.
//!
//! Run with: cargo bench -p lazy_group
//! Save baseline: cargo bench -p lazy_group -- --save-baseline main
//! Compare to baseline: cargo bench -p lazy_group -- --baseline main

#![allow(missing_docs, reason = "benchmark code")]

use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use criterion::{Criterion, criterion_group, criterion_main};
use lazy_group::LazyGroup;

static KEY_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_key() -> String {
    format!("key_{}", KEY_COUNTER.fetch_add(1, Ordering::Relaxed))
}

fn populated_group(keys: usize) -> LazyGroup<Arc<String>> {
    let group = LazyGroup::with_capacity(keys, || Arc::new("value".to_string()));
    for i in 0..keys {
        group.get(&format!("key_{i}"));
    }
    group
}

/// Hot path: the key already exists, only the shared lock is taken.
fn bench_hit(c: &mut Criterion) {
    let group = populated_group(1024);

    c.bench_function("hit", |b| {
        b.iter(|| black_box(group.get(black_box("key_512"))));
    });
}

/// Cold path: every call misses and constructs under the exclusive lock.
fn bench_miss(c: &mut Criterion) {
    let group = LazyGroup::new(|| Arc::new("value".to_string()));

    c.bench_function("miss", |b| {
        b.iter_batched(unique_key, |key| black_box(group.get(&key)), criterion::BatchSize::SmallInput);
    });
}

/// Many threads reading the same handful of keys at once.
/// This measures how well readers share the lock.
fn bench_contended_hits(c: &mut Criterion) {
    const THREADS: usize = 8;
    const READS_PER_THREAD: u64 = 1_000;

    let group = Arc::new(populated_group(16));

    c.bench_function("contended_hits_8x1000", |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;
            for _ in 0..iters {
                let barrier = Arc::new(Barrier::new(THREADS));
                let start = Instant::now();
                let workers: Vec<_> = (0..THREADS)
                    .map(|t| {
                        let group = Arc::clone(&group);
                        let barrier = Arc::clone(&barrier);
                        thread::spawn(move || {
                            barrier.wait();
                            for i in 0..READS_PER_THREAD {
                                black_box(group.get(&format!("key_{}", (i + t as u64) % 16)));
                            }
                        })
                    })
                    .collect();

                for worker in workers {
                    worker.join().expect("worker panicked");
                }
                total += start.elapsed();
            }
            total
        });
    });
}

criterion_group!(benches, bench_hit, bench_miss, bench_contended_hits);

criterion_main!(benches);
