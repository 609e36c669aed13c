use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_bank::distribution;
use rand::{rngs::StdRng, SeedableRng};

const V_DIM_LARGE: usize = 512;
const N: usize = 16;

// Benchmark for the creation of a normalized bank.
fn bench_generate_unit_16_512(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    c.bench_function("generate_unit_16_512", |b| {
        b.iter(|| distribution::generate_unit(&mut rng, black_box(N), black_box(V_DIM_LARGE)))
    });
}

criterion_group!(benches, bench_generate_unit_16_512);
criterion_main!(benches);
