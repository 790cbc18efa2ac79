// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks for MVCC store operations.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rubidiumkv::coder::StringUtf8Coder;
use rubidiumkv::store::{CompareResult, MvccStore, StoreSpec};
use tempfile::TempDir;

fn create_test_store() -> (Arc<MvccStore<String, String>>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MvccStore::new());
    let spec = StoreSpec::builder()
        .name("bench-store")
        .key_coder(StringUtf8Coder::new())
        .val_coder(StringUtf8Coder::new())
        .local_state_store_dir(dir.path().join("db"))
        .build()
        .unwrap();
    store.init(spec).unwrap();
    (store, dir)
}

fn bench_point_get(c: &mut Criterion) {
    let (store, _dir) = create_test_store();

    // Pre-populate with 10000 keys
    for i in 0..10000 {
        store
            .put_at(format!("key{i:05}"), "x".repeat(100), 1)
            .unwrap();
    }

    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Elements(1));

    group.bench_function("point_get", |b| {
        b.iter_batched(
            || format!("key{:05}", rand::random::<u32>() % 10000),
            |key| store.get(key).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_point_put(c: &mut Criterion) {
    let (store, _dir) = create_test_store();

    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Elements(1));

    let revision = AtomicI64::new(1);

    group.bench_function("point_put", |b| {
        b.iter(|| {
            let rev = revision.fetch_add(1, Ordering::Relaxed);
            store
                .put_at(format!("key{rev}"), "x".repeat(100), rev)
                .unwrap();
        })
    });

    group.finish();
}

fn bench_range_scan(c: &mut Criterion) {
    let (store, _dir) = create_test_store();

    for i in 0..10000 {
        store
            .put_at(format!("key{i:05}"), "x".repeat(100), 1)
            .unwrap();
    }

    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Elements(100));

    group.bench_function("range_scan_100", |b| {
        b.iter_batched(
            || {
                let start = rand::random::<u32>() % 9900;
                store
                    .op_factory()
                    .build_range_op()
                    .key(format!("key{start:05}"))
                    .end_key(format!("key{:05}", start + 99))
                    .limit(100)
                    .build()
                    .unwrap()
            },
            |op| {
                let result = store.range(&op).unwrap();
                assert_eq!(result.count(), 100);
                result.recycle();
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_txn(c: &mut Criterion) {
    let (store, _dir) = create_test_store();
    store
        .put_at("counter".to_string(), "0".to_string(), 1)
        .unwrap();

    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Elements(1));

    let revision = AtomicI64::new(2);
    let factory = store.op_factory();

    group.bench_function("compare_and_put", |b| {
        b.iter(|| {
            let rev = revision.fetch_add(1, Ordering::Relaxed);
            let op = factory
                .build_txn_op()
                .revision(rev)
                .add_compare_op(factory.compare_create_revision(
                    CompareResult::Equal,
                    "counter".to_string(),
                    1,
                ))
                .add_success_op(
                    factory
                        .build_put_op()
                        .key("counter".to_string())
                        .value(rev.to_string())
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap();
            let result = store.txn(&op).unwrap();
            assert!(result.is_success());
            result.recycle();
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_point_get,
    bench_point_put,
    bench_range_scan,
    bench_txn
);
criterion_main!(benches);
