//! Input affinities: pairwise distances, per-row perplexity calibration,
//! symmetrisation.

use nalgebra::DMatrix;
use rayon::prelude::*;

use super::cfg::Metric;

const BETA_TOL: f64 = 1e-5;
const BETA_STEPS: usize = 200;
pub(crate) const P_FLOOR: f64 = 1e-12;

/// Dense row-major `n × n` matrix of joint probabilities `P_ij` (zero diagonal).
#[derive(Clone, Debug)]
pub(crate) struct Affinities {
    pub n: usize,
    pub p: Vec<f64>,
}

impl Affinities {
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.p[i * self.n..(i + 1) * self.n]
    }
}

/// Row-major pairwise dissimilarities between the rows of `x`.
///
/// Euclidean uses squared distances (the Gaussian kernel's argument); cosine
/// uses `1 - cos`, with zero-norm rows at distance 1 from everything.
pub(crate) fn pairwise(x: &DMatrix<f64>, metric: Metric) -> Vec<f64> {
    let n = x.nrows();
    let norms: Vec<f64> = (0..n).map(|i| x.row(i).norm()).collect();
    let mut d = vec![0.0; n * n];
    d.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
        let xi = x.row(i);
        for (j, out) in row.iter_mut().enumerate() {
            if i == j {
                continue;
            }
            let xj = x.row(j);
            *out = match metric {
                Metric::Euclidean => (xi - xj).norm_squared(),
                Metric::Cosine => {
                    let denom = norms[i] * norms[j];
                    if denom > 0.0 {
                        (1.0 - xi.dot(&xj) / denom).max(0.0)
                    } else {
                        1.0
                    }
                }
            };
        }
    });
    d
}

/// Conditional `P_{j|i}` with the Gaussian precision `beta_i` bisected so the
/// row entropy matches `ln(perplexity)`. Returns the row and the final beta.
pub(crate) fn calibrate_row(dist: &[f64], i: usize, perplexity: f64, out: &mut [f64]) -> f64 {
    let target = perplexity.ln();
    // shift by the nearest neighbour distance to avoid underflow for far rows
    let d_min = dist
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(_, &d)| d)
        .fold(f64::INFINITY, f64::min);
    let d_min = if d_min.is_finite() { d_min } else { 0.0 };

    let mut beta = 1.0;
    let (mut lo, mut hi) = (0.0f64, f64::INFINITY);
    for _ in 0..BETA_STEPS {
        let mut sum = 0.0;
        let mut dot = 0.0;
        for (j, (o, &d)) in out.iter_mut().zip(dist).enumerate() {
            if j == i {
                *o = 0.0;
                continue;
            }
            let shifted = d - d_min;
            let v = (-beta * shifted).exp();
            *o = v;
            sum += v;
            dot += shifted * v;
        }
        if sum <= 0.0 {
            break;
        }
        let entropy = sum.ln() + beta * dot / sum;
        for o in out.iter_mut() {
            *o /= sum;
        }
        let diff = entropy - target;
        if diff.abs() < BETA_TOL {
            break;
        }
        if diff > 0.0 {
            lo = beta;
            beta = if hi.is_finite() { 0.5 * (beta + hi) } else { beta * 2.0 };
        } else {
            hi = beta;
            beta = 0.5 * (beta + lo);
        }
    }
    beta
}

/// Joint probabilities `P = (P_{j|i} + P_{i|j}) / 2n`, floored at `P_FLOOR`.
pub(crate) fn joint_probabilities(x: &DMatrix<f64>, metric: Metric, perplexity: f64) -> Affinities {
    let n = x.nrows();
    let dist = pairwise(x, metric);
    let mut cond = vec![0.0; n * n];
    cond.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
        calibrate_row(&dist[i * n..(i + 1) * n], i, perplexity, row);
    });

    let scale = 1.0 / (2.0 * n as f64);
    let mut p = vec![0.0; n * n];
    p.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
        for (j, out) in row.iter_mut().enumerate() {
            if i != j {
                *out = ((cond[i * n + j] + cond[j * n + i]) * scale).max(P_FLOOR);
            }
        }
    });
    Affinities { n, p }
}
