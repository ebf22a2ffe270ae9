//! Benchmarks for alignment and per-frame morphing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uvmorph::algo::morph::interpolate_positions_into;
use uvmorph::mesh::primitives::{cylinder, grid};
use uvmorph::prelude::*;

fn bench_alignment(c: &mut Criterion) {
    let mesh = grid(100).unwrap();
    c.bench_function("align_grid_100x100", |b| {
        b.iter(|| Alignment::compute(black_box(&mesh)))
    });

    let mesh = cylinder(512, 1.0, 2.0).unwrap();
    c.bench_function("align_cylinder_512", |b| {
        b.iter(|| Alignment::compute(black_box(&mesh)))
    });
}

fn bench_frame(c: &mut Criterion) {
    let mesh = grid(200).unwrap();
    let alignment = Alignment::compute(&mesh);
    let mut positions = Vec::new();

    let parallel = MorphOptions::default();
    c.bench_function("frame_grid_200x200_parallel", |b| {
        b.iter(|| interpolate_positions_into(&mesh, &alignment, black_box(0.5), &parallel, &mut positions))
    });

    let sequential = MorphOptions::default().sequential();
    c.bench_function("frame_grid_200x200_sequential", |b| {
        b.iter(|| {
            interpolate_positions_into(&mesh, &alignment, black_box(0.5), &sequential, &mut positions)
        })
    });

    let morpher = Morpher::new(cylinder(256, 1.0, 2.0).unwrap());
    c.bench_function("interpolate_cylinder_256", |b| {
        b.iter(|| morpher.interpolate(black_box(0.25)))
    });
}

criterion_group!(benches, bench_alignment, bench_frame);
criterion_main!(benches);
