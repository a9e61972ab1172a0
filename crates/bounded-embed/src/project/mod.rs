//! Nearest feasible point for an implicit boundary.
//!
//! Purpose
//! - Given a point with `F < 0`, find the closest `q` with `F(q) >= 0`.
//! - Derivative-free (shapes like the heart curve have kinks), best effort:
//!   an uncertified result is still feasible but has `converged = false`.
//!
//! Method
//! - `minimize_constrained`: PHR augmented Lagrangian over Nelder–Mead.
//! - `project_with_cfg`: distance objective with the boundary as the single
//!   inequality. The local solve can settle on the wrong lobe of a non-convex
//!   shape or hop across a thin cusp, so it competes with the radial crossing
//!   `center → point` and a ray scan around the center refined by
//!   golden-section search over the ray angle. Each candidate is moved onto
//!   the contour by bisection towards `point`; the nearest one wins.
//!
//! Code cross-refs: `boundary::Boundary`, `driver::BoundaryCorrector`

mod cfg;
mod simplex;
mod solve;

pub use cfg::SolverCfg;
pub use solve::{minimize_constrained, project_to_boundary, project_with_cfg, Minimum, Projection};

#[cfg(test)]
mod tests;
