//! # Transaction Pipeline Benchmarks
//!
//! | Stage | Measured |
//! |-------|----------|
//! | Publish | Decode, hash and notification stream of one transfer |
//! | Execute | Validate and observe a block into a throwaway delta |
//! | Apply | Full commit plus undo through `ChainService` |

use cc_06_pipeline::{BlockExecutor, TransactionExecutor};
use cc_05_plugins::load_plugins;
use cc_tests::fixtures::{block, chain, network_config, transfer, Keys, ALL_PLUGINS};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_types::{Amount, Height};
use std::time::Duration;

fn random_transfers(keys: &Keys, count: usize) -> Vec<Vec<u8>> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| transfer(keys, 0, rng.gen_range(1..4), rng.gen_range(1..1_000)))
        .collect()
}

// ============================================================================
// PUBLISH
// ============================================================================

fn bench_publish_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");

    let keys = Keys::new(4);
    let bundle = load_plugins(network_config(), &ALL_PLUGINS).expect("plugins load");
    let executor = TransactionExecutor::new(&bundle, false);
    let bytes = transfer(&keys, 0, 1, 100);
    let context = block(2, Vec::new()).context();

    group.bench_function("transfer", |b| {
        b.iter(|| black_box(executor.publish(black_box(&bytes), &context).is_ok()))
    });

    group.finish();
}

// ============================================================================
// EXECUTE
// ============================================================================

fn bench_execute_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");
    group.measurement_time(Duration::from_secs(10));

    let keys = Keys::new(4);
    let bundle = load_plugins(network_config(), &ALL_PLUGINS).expect("plugins load");
    let mut seed = bundle.cache.create_delta().expect("delta");
    keys.fund(&mut seed, 0, Amount(u64::MAX / 2));
    bundle.cache.commit(seed, Height(1)).expect("commit");
    let executor = BlockExecutor::new(&bundle, false);

    for size in [1usize, 10, 100] {
        let candidate = block(2, random_transfers(&keys, size));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("transfers", size), &candidate, |b, candidate| {
            b.iter(|| {
                let mut delta = bundle.cache.create_delta().expect("delta");
                black_box(executor.execute(candidate, &mut delta).is_ok())
            })
        });
    }

    group.finish();
}

// ============================================================================
// APPLY AND UNDO
// ============================================================================

fn bench_apply_and_undo(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    let keys = Keys::new(4);
    let (mut service, _sink) = chain();
    service
        .seed(|delta| keys.fund(delta, 0, Amount(u64::MAX / 2)))
        .expect("seed");
    let candidate = block(2, random_transfers(&keys, 10));

    group.bench_function("apply_then_undo_10", |b| {
        b.iter(|| {
            let finalized = service.apply_block(black_box(&candidate)).expect("apply");
            service.undo_last_block().expect("undo");
            black_box(finalized.state_hash)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_publish_transfer,
    bench_execute_block,
    bench_apply_and_undo
);
criterion_main!(benches);
