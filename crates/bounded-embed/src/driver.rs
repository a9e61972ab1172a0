//! Boundary-constrained embedding driver.
//!
//! Runs an `EmbeddingOptimizer` with a `BoundaryCorrector` attached as its
//! observer. On every callback the corrector evaluates the boundary on all
//! points, projects the ones with `F < 0` to their nearest feasible point
//! (independently, in parallel), writes them back into the optimiser's buffer
//! and records a snapshot. The last snapshot is the result.
//!
//! A lone observation is placed at the boundary center without running the
//! optimiser.

use nalgebra::DMatrix;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::boundary::{Boundary, Shape};
use crate::project::{project_with_cfg, SolverCfg};
use crate::tsne::{EmbeddingOptimizer, IterationObserver};
use crate::{EmbedError, PointSet, Vec2};

/// High-dimensional input rows plus the slot receiving the 2D layout.
#[derive(Clone, Debug)]
pub struct Observations {
    /// One row per observation (e.g. principal-component coordinates).
    pub x: DMatrix<f64>,
    pub embedding: Option<PointSet>,
}

impl Observations {
    pub fn new(x: DMatrix<f64>) -> Self {
        Self { x, embedding: None }
    }

    #[inline]
    pub fn n_obs(&self) -> usize {
        self.x.nrows()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DriverCfg {
    pub solver: SolverCfg,
}

/// Observer that keeps every iterate inside `boundary` and records the trace.
pub struct BoundaryCorrector<'b, B: Boundary + ?Sized> {
    boundary: &'b B,
    solver: SolverCfg,
    trace: Vec<PointSet>,
    corrected: usize,
}

impl<'b, B: Boundary + ?Sized> BoundaryCorrector<'b, B> {
    pub fn new(boundary: &'b B, solver: SolverCfg) -> Self {
        Self {
            boundary,
            solver,
            trace: Vec::new(),
            corrected: 0,
        }
    }

    /// Project every outside point in place; returns how many moved.
    pub fn correct(&self, points: &mut [Vec2]) -> usize {
        let values = self.boundary.eval_points(points);
        let outside: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f < 0.0)
            .map(|(i, _)| i)
            .collect();
        if outside.is_empty() {
            return 0;
        }
        let pts: &[Vec2] = points;
        let fixes: Vec<(usize, Vec2)> = outside
            .par_iter()
            .map(|&i| (i, project_with_cfg(pts[i], self.boundary, self.solver).point))
            .collect();
        for &(i, q) in &fixes {
            points[i] = q;
        }
        fixes.len()
    }

    /// Snapshots recorded so far, one per callback.
    pub fn trace(&self) -> &[PointSet] {
        &self.trace
    }

    /// Total number of point corrections across all callbacks.
    pub fn corrected(&self) -> usize {
        self.corrected
    }

    pub fn into_trace(self) -> Vec<PointSet> {
        self.trace
    }
}

impl<B: Boundary + ?Sized> IterationObserver for BoundaryCorrector<'_, B> {
    fn on_iteration(&mut self, iter: usize, error: f64, points: &mut [Vec2]) {
        let moved = self.correct(points);
        self.corrected += moved;
        if moved > 0 {
            debug!(iter, error, moved, "projected points back inside boundary");
        }
        self.trace.push(points.to_vec());
    }
}

/// Embed `obs` inside `shape` with default solver tolerances.
pub fn run<O>(obs: &mut Observations, shape: &Shape, optimizer: &mut O) -> Result<PointSet, EmbedError>
where
    O: EmbeddingOptimizer + ?Sized,
{
    info!(%shape, n = obs.n_obs(), "boundary-constrained embedding");
    run_with_cfg(obs, shape, optimizer, DriverCfg::default())
}

/// Embed `obs` inside any `Boundary`; the result is also stored in `obs.embedding`.
pub fn run_with_cfg<B, O>(
    obs: &mut Observations,
    boundary: &B,
    optimizer: &mut O,
    cfg: DriverCfg,
) -> Result<PointSet, EmbedError>
where
    B: Boundary + ?Sized,
    O: EmbeddingOptimizer + ?Sized,
{
    let n = obs.n_obs();
    if n == 0 {
        return Err(EmbedError::EmptyInput);
    }
    if n == 1 {
        let pts = vec![boundary.center()];
        obs.embedding = Some(pts.clone());
        return Ok(pts);
    }

    let mut corrector = BoundaryCorrector::new(boundary, cfg.solver);
    let fitted = optimizer.fit(&obs.x, &mut corrector)?;
    let snapshots = corrector.trace.len();
    let corrected = corrector.corrected;
    let points = match corrector.trace.pop() {
        Some(last) => last,
        None => {
            // optimiser never called back: correct its output once
            let mut pts = fitted;
            corrector.correct(&mut pts);
            pts
        }
    };
    if points.len() != n {
        return Err(EmbedError::LengthMismatch {
            expected: n,
            got: points.len(),
        });
    }
    info!(snapshots, corrected, "embedding finished");
    obs.embedding = Some(points.clone());
    Ok(points)
}
