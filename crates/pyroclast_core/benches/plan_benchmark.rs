//! Plan derivation throughput.
//!
//! A burst derives all of its plans synchronously before the first tween
//! starts, so derivation cost is the only CPU the engine spends up front.

use criterion::{criterion_group, criterion_main, Criterion};
use pyroclast_core::{derive_plan, ExplosionConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_derive_plan(c: &mut Criterion) {
    let config = ExplosionConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    c.bench_function("derive_plan_single", |b| {
        b.iter(|| derive_plan(4, &config, &mut rng));
    });

    c.bench_function("derive_plan_full_burst", |b| {
        b.iter(|| {
            (0..config.particle_count)
                .map(|index| derive_plan(index, &config, &mut rng))
                .collect::<Vec<_>>()
        });
    });
}

criterion_group!(benches, bench_derive_plan);
criterion_main!(benches);
