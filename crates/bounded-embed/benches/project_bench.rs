//! Criterion benchmarks for boundary evaluation and projection.
//! Results: by default under target/criterion.

use bounded_embed::boundary::{Boundary, Shape};
use bounded_embed::project::project_to_boundary;
use bounded_embed::Vec2;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Points on an annulus `r ∈ [lo, hi)` around the origin.
fn ring(n: usize, lo: f64, hi: f64, seed: u64) -> Vec<Vec2> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let t: f64 = rng.gen::<f64>() * std::f64::consts::TAU;
            let r = rng.gen_range(lo..hi);
            Vec2::new(r * t.cos(), r * t.sin())
        })
        .collect()
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary_eval");
    let pts = ring(10_000, 0.0, 6.0, 1);
    for shape in [Shape::default(), Shape::heart(1.0, 0.0, 0.0)] {
        group.bench_with_input(BenchmarkId::new("eval_points", shape.name()), &pts, |b, pts| {
            b.iter(|| shape.eval_points(pts))
        });
    }
    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_to_boundary");
    let pts = ring(64, 1.5, 20.0, 2);
    for shape in [Shape::circle(1.0, 0.0, 0.0), Shape::heart(1.0, 0.0, 0.0)] {
        group.bench_with_input(BenchmarkId::new("outside_64", shape.name()), &pts, |b, pts| {
            b.iter(|| {
                pts.iter()
                    .map(|p| project_to_boundary(*p, &shape))
                    .fold(0.0, |acc, q| acc + q.x)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_eval, bench_project);
criterion_main!(benches);
