use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use trustmesh_documents::{Block, BlockDraft};

const ISSUER: &str = "HgTTJLAQ5sqfknMq7yLPZbehtuLSsKj9CxWN7k8QvYJd";

fn block_json(txs: usize) -> Value {
    let transactions: Vec<Value> = (0..txs)
        .map(|i| {
            json!({
                "version": 10,
                "blockstamp": "99-0000A",
                "issuers": [ISSUER],
                "inputs": [format!("{i}:0:D:{ISSUER}:{i}")],
                "unlocks": ["0:SIG(0)"],
                "outputs": [format!("{i}:0:SIG({ISSUER})")],
                "signatures": ["sig=="]
            })
        })
        .collect();
    json!({
        "version": 10,
        "currency": "g1",
        "number": 100,
        "issuer": ISSUER,
        "certifications": vec!["A:B:0:sig"; 50],
        "transactions": transactions,
        "nonce": 1,
        "signature": "sig=="
    })
}

fn block_finalize_bench(c: &mut Criterion) {
    let input = block_json(100);

    c.bench_function("block_from_json_100tx", |b| {
        b.iter(|| Block::from_json(black_box(&input)))
    });
}

fn block_raw_signed_bench(c: &mut Criterion) {
    let draft = BlockDraft::from_json(&block_json(100));

    c.bench_function("block_raw_signed_100tx", |b| {
        b.iter(|| black_box(&draft).raw_signed())
    });
}

criterion_group!(benches, block_finalize_bench, block_raw_signed_bench);
criterion_main!(benches);
