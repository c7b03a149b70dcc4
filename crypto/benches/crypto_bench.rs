use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sha256_256b_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("sha256_256B", |b| {
        b.iter(|| trustmesh_crypto::sha256(black_box(&data)))
    });
}

fn sha256_1kb_bench(c: &mut Criterion) {
    let data = vec![0xCDu8; 1024];

    c.bench_function("sha256_1KB", |b| {
        b.iter(|| trustmesh_crypto::sha256(black_box(&data)))
    });
}

fn hash_document_bench(c: &mut Criterion) {
    let raw = "Version: 10\nType: Transaction\nCurrency: g1\n".repeat(20);

    c.bench_function("hash_document_900B", |b| {
        b.iter(|| trustmesh_crypto::hash_document(black_box(&raw)))
    });
}

criterion_group!(
    benches,
    sha256_256b_bench,
    sha256_1kb_bench,
    hash_document_bench
);
criterion_main!(benches);
