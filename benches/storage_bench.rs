// benches/storage_bench.rs

//! Store throughput benchmarks
//!
//! Measures KeyValueStore operations alone and under concurrent task load,
//! exercising the read/write lock split.

use criterion::{Criterion, criterion_group, criterion_main};
use opaldb::core::KeyValueStore;
use std::hint::black_box;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn bench_set_get(c: &mut Criterion) {
    let store = KeyValueStore::new();
    store.set("bench_key", "bench_value");

    c.bench_function("storage_set", |b| {
        b.iter(|| store.set(black_box("bench_key"), black_box("bench_value")))
    });

    c.bench_function("storage_get", |b| {
        b.iter(|| black_box(store.get(black_box("bench_key"))))
    });
}

fn bench_concurrent_set(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("storage_concurrent_set_8x64", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = Arc::new(KeyValueStore::new());
                let mut handles = Vec::new();
                for task in 0..8 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        for i in 0..64 {
                            store.set(format!("key{task}_{i}"), "value");
                        }
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }
                black_box(store.len())
            })
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let store = KeyValueStore::new();
    for i in 0..1000 {
        store.set(format!("key{i}"), format!("value{i}"));
    }

    c.bench_function("storage_snapshot_1k", |b| {
        b.iter(|| black_box(store.snapshot().unwrap()))
    });
}

criterion_group!(benches, bench_set_get, bench_concurrent_set, bench_snapshot);
criterion_main!(benches);
