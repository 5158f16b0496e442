//! Criterion benches for the force pipeline on synthetic blocks.
//! Focus sizes: n×n grids with n in {4, 8, 16, 24}.
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use footprint::classify::{relative_position, ClassifyCfg};
use footprint::forces::{calc_forces, ForceCfg};
use footprint::geom::rand::{draw_block, BlockCfg, ReplayToken};
use footprint::geom::{working_boundaries, ClipCfg};

fn block(n: usize, seed: u64) -> footprint::FootprintSet {
    let cfg = BlockCfg {
        rows: n,
        cols: n,
        ..BlockCfg::default()
    };
    draw_block(cfg, ReplayToken { seed, index: 0 })
}

fn bench_forces(c: &mut Criterion) {
    let mut group = c.benchmark_group("forces");
    for &n in &[4usize, 8, 16, 24] {
        group.bench_with_input(BenchmarkId::new("working_boundaries", n), &n, |b, &n| {
            b.iter_batched(
                || block(n, 17).polygons(),
                |polys| {
                    let _wb = working_boundaries(&polys, 0.5, &ClipCfg::default());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("calc_forces", n), &n, |b, &n| {
            let cfg = ForceCfg {
                buffer: 0.5,
                height_column: Some("height".into()),
                ..ForceCfg::default()
            };
            b.iter_batched(
                || block(n, 18),
                |set| {
                    let _out = calc_forces(&set, &cfg).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("relative_position", n), &n, |b, &n| {
            let forces = calc_forces(&block(n, 19), &ForceCfg::default()).unwrap();
            b.iter(|| relative_position(&forces, &ClassifyCfg::default()).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_forces);
criterion_main!(benches);
