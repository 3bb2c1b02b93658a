use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use kaboom_core::*;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for difficulty in Difficulty::ALL {
        let config = difficulty.game_config();
        group.bench_function(difficulty.name(), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                let generator = RandomMinefieldGenerator::new(black_box(seed), Some((0, 0)));
                black_box(generator.generate(config))
            });
        });
    }
    group.finish();
}

fn bench_flood_fill(c: &mut Criterion) {
    // a sparse hard board so the first reveal cascades across most of it
    let config = GameConfig::new(Difficulty::Hard.game_config().size, 10);
    let field = RandomMinefieldGenerator::new(7, Some((8, 15)))
        .generate(config)
        .expect("sparse board fits");

    c.bench_function("reveal_cascade_hard", |b| {
        b.iter(|| black_box(field.reveal(black_box((8, 15)))));
    });
}

fn bench_tip(c: &mut Criterion) {
    let field = RandomMinefieldGenerator::new(3, Some((8, 15)))
        .generate(Difficulty::Hard.game_config())
        .expect("preset fits");
    let (field, _) = field.reveal((8, 15)).expect("in bounds");

    c.bench_function("find_tip_cell_hard", |b| {
        b.iter(|| black_box(field.find_tip_cell()));
    });
}

criterion_group!(benches, bench_generate, bench_flood_fill, bench_tip);
criterion_main!(benches);
