//! # Transfer Records Benchmarks
//!
//! | Operation | Shape |
//! |-----------|-------|
//! | create | one record plus one index marker per call |
//! | queryByOriginator | selector scan over all records |
//! | queryIndex | key-range scan over one originator |
//! | history | version walk of one key |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ft_01_transfer_records::{InMemoryLedger, TransferConfig, TransferDispatcher};
use std::time::Duration;

fn seeded_ledger<S: ft_01_transfer_records::TransferRecordsApi>(
    dispatcher: &TransferDispatcher<S>,
    records: usize,
) -> InMemoryLedger {
    let mut ledger = InMemoryLedger::new();
    for i in 0..records {
        let originator = format!("user-{}", i % 10);
        let file = format!("hash-{i}");
        ledger.invoke(dispatcher, "create", &[originator.as_str(), file.as_str(), "archive"]);
    }
    ledger
}

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("ft-01-create");
    group.measurement_time(Duration::from_secs(5));

    let dispatcher = TransferDispatcher::with_defaults(TransferConfig::default()).unwrap();
    let mut ledger = InMemoryLedger::new();
    let mut i = 0u64;

    group.throughput(Throughput::Elements(1));
    group.bench_function("create_generated_id", |b| {
        b.iter(|| {
            i += 1;
            let file = format!("hash-{i}");
            black_box(ledger.invoke(&dispatcher, "create", &["alice", file.as_str(), "bob"]))
        })
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("ft-01-query");
    let dispatcher = TransferDispatcher::with_defaults(TransferConfig::default()).unwrap();

    for size in [100, 1_000, 10_000] {
        let mut ledger = seeded_ledger(&dispatcher, size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("query_by_originator", size), &size, |b, _| {
            b.iter(|| black_box(ledger.invoke(&dispatcher, "queryByOriginator", &["user-3"])))
        });
        group.bench_with_input(BenchmarkId::new("query_index", size), &size, |b, _| {
            b.iter(|| {
                black_box(ledger.invoke(&dispatcher, "queryIndex", &["originator~hash", "user-3"]))
            })
        });
    }

    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("ft-01-history");
    let dispatcher = TransferDispatcher::with_defaults(TransferConfig::default()).unwrap();

    for versions in [1, 10, 100] {
        let mut ledger = InMemoryLedger::new();
        let created = ledger.invoke(&dispatcher, "create", &["alice", "h", "bob"]);
        let id = String::from_utf8(created.payload).unwrap();
        for _ in 1..versions {
            ledger.invoke(&dispatcher, "complete", &[id.as_str()]);
        }

        group.bench_with_input(BenchmarkId::new("history", versions), &versions, |b, _| {
            b.iter(|| black_box(ledger.invoke(&dispatcher, "history", &[id.as_str()])))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_queries, bench_history);
criterion_main!(benches);
