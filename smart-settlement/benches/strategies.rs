//! Benchmarks for settlement heuristics
//!
//! Benchmarks:
//! - Each heuristic on groups of increasing size
//! - Full calculation including normalization and selection

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use smart_settlement::{
    calculate_settlement, normalizer::normalize, Algorithm, ParticipantId, DEFAULT_TOLERANCE,
};
use std::collections::BTreeMap;

/// Deterministic zero-sum group of `size` participants
fn group(size: usize) -> BTreeMap<ParticipantId, f64> {
    let mut balances: BTreeMap<ParticipantId, f64> = (1..size)
        .map(|i| {
            let magnitude = ((i * 37) % 500 + 1) as f64 * 0.25;
            let balance = if i % 3 == 0 { magnitude } else { -magnitude };
            (i as ParticipantId, balance)
        })
        .collect();
    let closing = -balances.values().sum::<f64>();
    balances.insert(size as ParticipantId, closing);
    balances
}

/// Benchmark individual heuristics
fn bench_heuristics(c: &mut Criterion) {
    let mut group_bench = c.benchmark_group("heuristics");

    for size in [10usize, 50, 200] {
        let participants = normalize(&group(size), &[], DEFAULT_TOLERANCE).unwrap();

        for algorithm in [
            Algorithm::GreedyHeap,
            Algorithm::MinMaxFlow,
            Algorithm::BalancedPartition,
            Algorithm::SimpleGreedy,
        ] {
            group_bench.bench_with_input(
                BenchmarkId::new(algorithm.name(), size),
                &participants,
                |b, participants| {
                    b.iter(|| black_box(algorithm.run(participants.clone(), DEFAULT_TOLERANCE)))
                },
            );
        }
    }

    group_bench.finish();
}

/// Benchmark the full calculation
fn bench_calculation(c: &mut Criterion) {
    let balances = group(100);

    c.bench_function("calculate_settlement_100", |b| {
        b.iter(|| black_box(calculate_settlement(black_box(&balances), &[])))
    });
}

criterion_group!(benches, bench_heuristics, bench_calculation);
criterion_main!(benches);
