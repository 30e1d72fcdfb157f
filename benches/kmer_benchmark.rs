use criterion::{criterion_group, criterion_main, Criterion};
use pyseq::{extract_minimizers, KmerParams};

fn performance_test(c: &mut Criterion) {
    let seq = "ACGTACGATCGATCGATCGATCGGATCGATCGATCGATCGTAGCTAGCTAGCATCG".repeat(20);
    let params = KmerParams::new(31, 19, 0.2).unwrap();

    c.bench_function("extract_minimizers", |b| {
        b.iter(|| {
            let _ = extract_minimizers(&seq, &params);
        });
    });
}

criterion_group!(benches, performance_test);
criterion_main!(benches);
