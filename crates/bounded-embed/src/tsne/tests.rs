use nalgebra::DMatrix;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::optimize::initial_layout;
use super::*;
use crate::Vec2;

/// Three tight blobs of `per` points in 5D.
fn blobs(per: usize, seed: u64) -> DMatrix<f64> {
    let centers = [
        [0.0, 0.0, 0.0, 0.0, 0.0],
        [10.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 10.0, 0.0, 0.0, 0.0],
    ];
    let mut rng = StdRng::seed_from_u64(seed);
    DMatrix::from_fn(3 * per, 5, |i, j| centers[i / per][j] + rng.gen_range(-0.5..0.5))
}

fn small_cfg() -> TsneCfg {
    TsneCfg {
        perplexity: 5.0,
        metric: Metric::Euclidean,
        n_iter: 250,
        early_exaggeration_iter: 100,
        n_jobs: 2,
        ..TsneCfg::default()
    }
}

#[test]
fn separates_blobs() {
    let per = 10;
    let x = blobs(per, 3);
    let mut tsne = Tsne::new(small_cfg());
    assert!(!tsne.is_fitted());
    let y = tsne
        .fit(&x, &mut |_: usize, _: f64, _: &mut [Vec2]| {})
        .unwrap();
    assert_eq!(y.len(), 3 * per);
    assert!(tsne.is_fitted());
    assert_eq!(tsne.embedding().unwrap(), &y[..]);

    let (mut intra, mut n_intra, mut inter, mut n_inter) = (0.0, 0, 0.0, 0);
    for i in 0..y.len() {
        for j in (i + 1)..y.len() {
            let d = (y[i] - y[j]).norm();
            if i / per == j / per {
                intra += d;
                n_intra += 1;
            } else {
                inter += d;
                n_inter += 1;
            }
        }
    }
    let (intra, inter) = (intra / n_intra as f64, inter / n_inter as f64);
    assert!(inter > 2.0 * intra, "intra={} inter={}", intra, inter);
}

#[test]
fn observer_cadence_and_errors() {
    let x = blobs(4, 9);
    let cfg = TsneCfg {
        n_iter: 30,
        callback_every: 3,
        ..small_cfg()
    };
    let mut seen = Vec::new();
    let mut obs = |it: usize, err: f64, pts: &mut [Vec2]| {
        assert_eq!(pts.len(), 12);
        assert!(err.is_finite() && err >= -1e-9);
        seen.push(it);
    };
    Tsne::new(cfg).fit(&x, &mut obs).unwrap();
    assert_eq!(seen, (1..=10).map(|k| 3 * k).collect::<Vec<_>>());
}

#[test]
fn observer_runs_inside_the_worker_pool() {
    let x = blobs(4, 5);
    let cfg = TsneCfg {
        n_iter: 6,
        n_jobs: 3,
        ..small_cfg()
    };
    let mut threads = Vec::new();
    let mut obs = |_: usize, _: f64, _: &mut [Vec2]| {
        threads.push(rayon::current_num_threads());
    };
    Tsne::new(cfg).fit(&x, &mut obs).unwrap();
    assert_eq!(threads, vec![3; 6]);
}

#[test]
fn observer_edits_seed_the_next_iteration() {
    let x = blobs(4, 11);
    let cfg = TsneCfg {
        n_iter: 20,
        early_exaggeration_iter: 0,
        learning_rate: Some(10.0),
        ..small_cfg()
    };
    let target = Vec2::new(100.0, 100.0);
    let mut after_edit = None;
    let mut obs = |it: usize, _: f64, pts: &mut [Vec2]| {
        if it == 11 {
            after_edit = Some(pts[0]);
        }
        if it == 10 {
            pts[0] = target;
        }
    };
    Tsne::new(cfg).fit(&x, &mut obs).unwrap();
    let p = after_edit.unwrap();
    assert!((p - target).norm() < 5.0, "p={:?}", p);
}

#[test]
fn rejects_bad_input() {
    let mut tsne = Tsne::default();
    let mut noop = |_: usize, _: f64, _: &mut [Vec2]| {};
    assert!(matches!(
        tsne.fit(&DMatrix::zeros(1, 3), &mut noop),
        Err(OptimizerError::TooFewObservations { n: 1 })
    ));
    assert!(matches!(
        tsne.fit(&DMatrix::zeros(4, 0), &mut noop),
        Err(OptimizerError::NoFeatures)
    ));
    let mut x = DMatrix::from_element(4, 2, 1.0);
    x[(2, 1)] = f64::NAN;
    assert!(matches!(
        tsne.fit(&x, &mut noop),
        Err(OptimizerError::NonFiniteInput { row: 2, col: 1 })
    ));
    let mut bad = Tsne::new(TsneCfg {
        perplexity: 0.0,
        ..TsneCfg::default()
    });
    assert!(matches!(
        bad.fit(&DMatrix::from_element(4, 2, 1.0), &mut noop),
        Err(OptimizerError::InvalidPerplexity(_))
    ));
    assert!(!tsne.is_fitted());
}

#[test]
fn pca_init_is_scaled_and_random_is_seeded() {
    let x = blobs(5, 1);
    let y = initial_layout(&x, Init::Pca, 0);
    let m = y.iter().map(|p| p.x).sum::<f64>() / y.len() as f64;
    let sd = (y.iter().map(|p| (p.x - m).powi(2)).sum::<f64>() / y.len() as f64).sqrt();
    assert!(m.abs() < 1e-15);
    assert!((sd - INIT_STD).abs() < 1e-12);

    let a = initial_layout(&x, Init::Random, 5);
    let b = initial_layout(&x, Init::Random, 5);
    assert_eq!(a, b);
    assert!(a.iter().all(|p| p.norm() < 1e-2));
}

#[test]
fn cfg_from_loose_bag() {
    let cfg: TsneCfg =
        serde_json::from_str(r#"{"perplexity": 30, "metric": "euclidean", "callbacks": "x"}"#)
            .unwrap();
    assert_eq!(cfg.perplexity, 30.0);
    assert_eq!(cfg.metric, Metric::Euclidean);
    assert_eq!(cfg.n_iter, TsneCfg::default().n_iter);
    assert_eq!(cfg.effective_perplexity(10), 3.0);
    assert_eq!(cfg.learning_rate_for(12_000), 1000.0);
}
