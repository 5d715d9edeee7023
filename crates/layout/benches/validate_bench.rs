//! Benchmarks for candidate validation and connectivity queries.
//!
//! Generators call `valid_candidates` once per cell, which validates every
//! catalog row in all four rotations, so this is the hot path of a run.
//!
//! Run with: cargo bench -p layout --features bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bevy::math::IVec2;
use layout::config::LayoutConfig;
use layout::test_harness::TestLayout;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A grid with a corridor along every other row, so interior cells have
/// generated neighbours to check against.
fn striped_layout(size: u32) -> TestLayout {
    let mut layout = TestLayout::with_config(LayoutConfig::with_size(size, size).with_seed(7));
    for y in (0..size as i32).step_by(2) {
        for x in 0..size as i32 {
            let row = if x == 0 {
                ("DeadEnd", 0)
            } else if x == size as i32 - 1 {
                ("DeadEnd", 2)
            } else {
                ("Straight", 0)
            };
            layout.assign(IVec2::new(x, y), row.0, row.1);
        }
    }
    layout
}

// ---------------------------------------------------------------------------
// Benches
// ---------------------------------------------------------------------------

fn bench_valid_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("valid_candidates");
    for size in [8u32, 32, 64] {
        let layout = striped_layout(size);
        let target = IVec2::new(size as i32 / 2, 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                black_box(layout.grid.valid_candidates(
                    black_box(target),
                    &layout.catalog,
                    &layout.diagnostics,
                ))
            })
        });
    }
    group.finish();
}

fn bench_open_connections(c: &mut Criterion) {
    let layout = striped_layout(64);
    c.bench_function("open_connections_64", |b| {
        b.iter(|| black_box(layout.grid.open_connections()))
    });
    c.bench_function("is_fully_connected_64", |b| {
        b.iter(|| black_box(layout.grid.is_fully_connected()))
    });
}

criterion_group!(benches, bench_valid_candidates, bench_open_connections);
criterion_main!(benches);
