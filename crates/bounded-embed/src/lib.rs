//! Boundary-constrained 2D embeddings.
//!
//! Observations are embedded in the plane by an iterative optimiser (exact
//! t-SNE here) while every iterate is kept inside an implicit outer contour
//! `F(x, y) >= 0` (circle, heart curve, or any closure). Points that leave the
//! contour are snapped back to their nearest feasible point before the next
//! gradient step, so the whole trajectory respects the shape, not only the
//! final layout.
//!
//! Layout
//! - `coords`: Cartesian/polar conversion and translation.
//! - `boundary`: implicit boundary functions (`Shape`, `Implicit`, `Boundary`).
//! - `project`: nearest feasible point via a derivative-free constrained solve.
//! - `tsne`: exact t-SNE with a per-iteration observer hook.
//! - `driver`: wires the above together (`run`).
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.

pub mod api;
pub mod boundary;
pub mod coords;
pub mod driver;
mod error;
pub mod project;
pub mod tsne;

pub use error::EmbedError;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A point in the embedding plane.
pub type Vec2 = nalgebra::Vector2<f64>;

/// One 2D coordinate per observation, in dataset order.
pub type PointSet = Vec<Vec2>;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::boundary::{circle, heart, Boundary, Implicit, Shape};
    pub use crate::coords::{cartesian_to_polar, translate};
    pub use crate::driver::{run, run_with_cfg, DriverCfg, Observations};
    pub use crate::project::{project_to_boundary, SolverCfg};
    pub use crate::tsne::{EmbeddingOptimizer, IterationObserver, Metric, Tsne, TsneCfg};
    pub use crate::{EmbedError, PointSet, Vec2};
}
