// Ledger benchmarks.
//
// Covers single-block digesting, appending, and full-chain validation at
// several chain lengths.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;

use hashchain_ledger::{Block, BlockDraft, Chain};

fn build_chain(len: u64) -> Chain {
    let mut chain = Chain::new();
    for i in 1..len {
        chain
            .append(BlockDraft::new(
                i,
                "01/09/2021",
                json!({ "sender": "Dennis", "recipient": "Sanya", "quantity": i }),
            ))
            .unwrap();
    }
    chain
}

fn bench_compute_digest(c: &mut Criterion) {
    let block = Block::unlinked(
        1,
        "01/09/2021",
        json!({ "sender": "Dennis", "recipient": "Sanya", "quantity": 20 }),
    );

    c.bench_function("block/compute_digest", |b| {
        b.iter(|| block.compute_digest());
    });
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("chain/append", |b| {
        b.iter_with_setup(
            || build_chain(16),
            |mut chain| {
                chain
                    .append(BlockDraft::new(16, "02/09/2021", json!({ "quantity": 370 })))
                    .unwrap();
            },
        );
    });
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain/validate");

    for len in [10u64, 100, 1_000] {
        let chain = build_chain(len);
        group.throughput(Throughput::Elements(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &chain, |b, chain| {
            b.iter(|| chain.validate().unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_digest, bench_append, bench_validate);
criterion_main!(benches);
