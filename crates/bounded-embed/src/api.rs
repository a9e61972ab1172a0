//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI, the
//!   Python bindings and experiments. Breaking changes are allowed.

// Shapes
pub use crate::boundary::{circle, heart, heart_radius, Boundary, Implicit, Shape};
// Geometry helpers
pub use crate::coords::{cartesian_to_polar, polar_about, polar_to_cartesian, translate};
// Projection
pub use crate::project::{
    minimize_constrained, project_to_boundary, project_with_cfg, Minimum, Projection, SolverCfg,
};
// Optimiser
pub use crate::tsne::{
    EmbeddingOptimizer, Init, IterationObserver, Metric, OptimizerError, Tsne, TsneCfg,
};
// Driver
pub use crate::driver::{run, run_with_cfg, BoundaryCorrector, DriverCfg, Observations};

use crate::{PointSet, Vec2};

/// Fraction of `points` with `F >= 0`. Empty sets count as fully inside.
pub fn inside_fraction<B: Boundary + ?Sized>(boundary: &B, points: &[Vec2]) -> f64 {
    if points.is_empty() {
        return 1.0;
    }
    let inside = points.iter().filter(|p| boundary.contains(**p)).count();
    inside as f64 / points.len() as f64
}

/// Project every point of `points` that lies outside `boundary` (one corrective pass).
pub fn clamp_inside<B: Boundary + ?Sized>(boundary: &B, points: &[Vec2]) -> PointSet {
    let mut out = points.to_vec();
    BoundaryCorrector::new(boundary, SolverCfg::default()).correct(&mut out);
    out
}
