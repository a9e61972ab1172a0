//! Iterative 2D embedding with a per-iteration observer.
//!
//! Purpose
//! - `EmbeddingOptimizer` is the seam the driver talks to: fit a high-dim
//!   input, push intermediate layouts to an `IterationObserver`, block until
//!   done, return the last layout.
//! - `Tsne` is the bundled backend (exact t-SNE: perplexity-calibrated
//!   Gaussian affinities, Student-t output kernel, early exaggeration,
//!   momentum + gains). Heavy loops run on a rayon pool of `n_jobs` threads.
//!
//! Observer contract
//! - Called synchronously between iterations with the live buffer. Edits made
//!   by the observer are the starting point of the next iteration.
//! - Runs on the optimiser's thread pool; observers must be `Send`.

mod affinity;
mod cfg;
mod gradient;
mod optimize;

use nalgebra::DMatrix;
use thiserror::Error;

use crate::{PointSet, Vec2};

pub use cfg::{Init, Metric, TsneCfg, INIT_STD};
pub use optimize::Tsne;

/// Receives the current layout every `callback_every` iterations.
///
/// `Tsne` calls it inside its worker pool, so rayon work done by the observer
/// is bounded by `n_jobs` as well.
pub trait IterationObserver: Send {
    /// `iter` is 1-based; `error` is the KL divergence at the start of the step.
    fn on_iteration(&mut self, iter: usize, error: f64, points: &mut [Vec2]);
}

impl<F> IterationObserver for F
where
    F: FnMut(usize, f64, &mut [Vec2]) + Send,
{
    #[inline]
    fn on_iteration(&mut self, iter: usize, error: f64, points: &mut [Vec2]) {
        self(iter, error, points)
    }
}

/// Iterative optimiser producing one 2D point per input row.
pub trait EmbeddingOptimizer {
    fn fit(
        &mut self,
        input: &DMatrix<f64>,
        observer: &mut dyn IterationObserver,
    ) -> Result<PointSet, OptimizerError>;
}

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("need at least 2 observations, got {n}")]
    TooFewObservations { n: usize },
    #[error("input has no feature columns")]
    NoFeatures,
    #[error("perplexity must be positive, got {0}")]
    InvalidPerplexity(f64),
    #[error("non-finite input value at row {row}, column {col}")]
    NonFiniteInput { row: usize, col: usize },
    #[error("embedding diverged at iteration {iter} (point {index} is not finite)")]
    Diverged { iter: usize, index: usize },
    #[error("could not build worker pool: {0}")]
    ThreadPool(String),
}

#[cfg(test)]
mod tests;
