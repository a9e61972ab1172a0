//! Synthetic growth-plate style run: a branching trajectory embedded inside a
//! circle and a heart, with timings and containment of the final layout.
//!
//! Purpose
//! - Give a quick, reproducible feel for how long a constrained run takes at a
//!   few hundred observations and how the contour shapes the layout.
//!
//! Run: `cargo run --release -p bounded-embed --example growth_plate`

use std::time::Instant;

use bounded_embed::api::{inside_fraction, run, Metric, Observations, Shape, Tsne, TsneCfg};
use nalgebra::DMatrix;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Two branches leaving a shared stem in 8D, with pseudotime along each.
fn branching(n: usize, seed: u64) -> DMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    DMatrix::from_fn(n, 8, |i, j| {
        let t = (i % (n / 2)) as f64 / (n / 2) as f64;
        let branch = i / (n / 2);
        let base = match j {
            0 => 4.0 * t,
            1 if branch == 0 => 3.0 * (t - 0.5).max(0.0),
            2 if branch == 1 => 3.0 * (t - 0.5).max(0.0),
            _ => 0.0,
        };
        base + rng.gen_range(-0.15..0.15)
    })
}

fn main() {
    let x = branching(300, 17);
    for shape in [Shape::circle(1.0, 0.0, 0.0), Shape::heart(1.0, 0.0, 0.0)] {
        let mut obs = Observations::new(x.clone());
        let mut tsne = Tsne::new(TsneCfg {
            perplexity: 30.0,
            metric: Metric::Euclidean,
            ..TsneCfg::default()
        });
        let start = Instant::now();
        let pts = run(&mut obs, &shape, &mut tsne).expect("constrained embedding");
        let ms = start.elapsed().as_secs_f64() * 1e3;
        let spread = pts.iter().map(|p| p.norm()).fold(0.0, f64::max);
        println!(
            "{}: n={} time={:.1} ms inside={:.3} max|p|={:.3}",
            shape,
            pts.len(),
            ms,
            inside_fraction(&shape, &pts),
            spread
        );
    }
}
