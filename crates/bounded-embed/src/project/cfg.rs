//! Solver tolerances.

/// Tolerances and budgets for the constrained projection.
///
/// `rho_begin` plays the role of COBYLA's initial trust radius: it sizes the
/// first simplex. Later outer rounds shrink it by 10× down to `rho_end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverCfg {
    pub rho_begin: f64,
    pub rho_end: f64,
    /// Simplex diameter below which an inner solve stops.
    pub x_tol: f64,
    /// Spread of objective values below which an inner solve stops.
    pub f_tol: f64,
    /// Constraint violation accepted as feasible.
    pub feas_tol: f64,
    /// Function evaluations per inner solve.
    pub max_evals: usize,
    /// Augmented-Lagrangian rounds.
    pub max_outer: usize,
    pub mu_init: f64,
    pub mu_max: f64,
    /// Rays cast from the boundary center to bracket the global nearest
    /// point. `0` keeps only the local solve and the radial seed.
    pub scan_rays: usize,
    /// `F(q) <= boundary_tol` counts as lying on the contour.
    pub boundary_tol: f64,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self {
            rho_begin: 1.0,
            rho_end: 1e-4,
            x_tol: 1e-10,
            f_tol: 1e-13,
            feas_tol: 1e-8,
            max_evals: 1000,
            max_outer: 40,
            mu_init: 10.0,
            mu_max: 1e8,
            scan_rays: 64,
            boundary_tol: 1e-6,
        }
    }
}

/// Attempts of the inward feasibility polish (step doubles each time).
pub(crate) const POLISH_STEPS: usize = 64;

/// Bisection halvings along a segment (ends earlier at `x_tol`).
pub(crate) const BISECT_STEPS: usize = 128;

/// Best local minima of the ray scan refined by golden-section search.
pub(crate) const REFINE_SEEDS: usize = 3;

/// Distance margin within which a certified candidate beats an uncertified one.
pub(crate) const CANDIDATE_TIE: f64 = 1e-9;

/// Golden-section iterations over the ray angle (ends earlier at `ANGLE_TOL`).
pub(crate) const GOLDEN_STEPS: usize = 100;
pub(crate) const ANGLE_TOL: f64 = 1e-12;
