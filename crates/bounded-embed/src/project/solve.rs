//! Augmented-Lagrangian outer loop and the boundary projection built on it.

use std::cell::Cell;
use std::f64::consts::TAU;

use tracing::debug;

use super::cfg::{
    SolverCfg, ANGLE_TOL, BISECT_STEPS, CANDIDATE_TIE, GOLDEN_STEPS, POLISH_STEPS, REFINE_SEEDS,
};
use super::simplex::nelder_mead;
use crate::boundary::Boundary;
use crate::Vec2;

/// Result of a constrained minimisation (best effort; see `converged`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Minimum {
    pub x: Vec2,
    pub f: f64,
    /// Largest violation `max(0, -c_i(x))` over the constraints.
    pub violation: f64,
    pub evals: usize,
    pub converged: bool,
}

/// Diagnostics of a single projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub point: Vec2,
    /// `F` at the returned point.
    pub value: f64,
    pub evals: usize,
    pub converged: bool,
}

/// PHR penalty term for `c >= 0` with multiplier `lambda` and weight `mu`.
#[inline]
fn phr(c: f64, lambda: f64, mu: f64) -> f64 {
    if c < lambda / mu {
        -lambda * c + 0.5 * mu * c * c
    } else {
        -0.5 * lambda * lambda / mu
    }
}

fn max_violation(x: Vec2, cons: &[&dyn Fn(Vec2) -> f64]) -> f64 {
    cons.iter().map(|c| (-c(x)).max(0.0)).fold(0.0, f64::max)
}

/// Minimise `objective` subject to `c_i(x) >= 0` for every constraint, seeded at `x0`.
///
/// Derivative-free: augmented-Lagrangian rounds, each an unconstrained
/// Nelder–Mead solve. Never fails; if the budget runs out the last iterate is
/// returned with `converged = false`.
pub fn minimize_constrained<O>(
    objective: O,
    x0: Vec2,
    cons: &[&dyn Fn(Vec2) -> f64],
    cfg: SolverCfg,
) -> Minimum
where
    O: Fn(Vec2) -> f64,
{
    let mut x = x0;
    let mut lambda = vec![0.0; cons.len()];
    let mut mu = cfg.mu_init;
    let mut step = cfg.rho_begin;
    let mut evals = 0;
    let mut converged = false;
    let mut prev_viol = max_violation(x, cons);

    for _ in 0..cfg.max_outer {
        let lagrangian = |z: Vec2| {
            let mut v = objective(z);
            for (c, &l) in cons.iter().zip(&lambda) {
                v += phr(c(z), l, mu);
            }
            v
        };
        let inner = nelder_mead(lagrangian, x, step, cfg.x_tol, cfg.f_tol, cfg.max_evals);
        evals += inner.evals;
        let moved = (inner.x - x).norm();
        x = inner.x;

        let mut viol = 0.0f64;
        for (c, l) in cons.iter().zip(lambda.iter_mut()) {
            let cx = c(x);
            *l = (*l - mu * cx).max(0.0);
            viol = viol.max((-cx).max(0.0));
        }
        if viol <= cfg.feas_tol && moved <= cfg.rho_end && inner.converged {
            converged = true;
            break;
        }
        if viol > 0.25 * prev_viol {
            mu = (mu * 10.0).min(cfg.mu_max);
        }
        prev_viol = viol;
        step = (step * 0.1).max(cfg.rho_end);
    }

    Minimum {
        x,
        f: objective(x),
        violation: max_violation(x, cons),
        evals,
        converged,
    }
}

/// Closest point to `point` with `boundary >= 0`, using default tolerances.
///
/// Points already inside come back unchanged. Outside points land on the
/// contour (or just inside it) up to solver tolerance.
pub fn project_to_boundary<B: Boundary + ?Sized>(point: Vec2, boundary: &B) -> Vec2 {
    project_with_cfg(point, boundary, SolverCfg::default()).point
}

/// As `project_to_boundary`, with explicit tolerances and a diagnostics report.
///
/// Candidates, nearest feasible one wins:
/// - the augmented-Lagrangian solve seeded at `point`;
/// - the crossing of the segment `center → point`;
/// - when `cfg.scan_rays > 0` and the center is inside, the best local minima
///   of a ray scan around the center, refined over the ray angle.
///
/// Every candidate is moved onto the contour along the segment towards
/// `point`, which only shortens the distance. `converged` is false when the
/// result is not certified by a converged search or is not on the contour.
pub fn project_with_cfg<B: Boundary + ?Sized>(
    point: Vec2,
    boundary: &B,
    cfg: SolverCfg,
) -> Projection {
    let f0 = boundary.eval_at(point);
    // NaN is treated as "not outside", matching the driver's `F < 0` scan.
    if f0 >= 0.0 || f0.is_nan() {
        return Projection {
            point,
            value: f0,
            evals: 1,
            converged: true,
        };
    }

    let counted = Counted::new(boundary);
    let mut best: Option<Candidate> = None;
    let mut offer = |c: Option<Candidate>| {
        let Some(c) = c else { return };
        let better = match best {
            None => true,
            Some(b) => {
                c.dist < b.dist - CANDIDATE_TIE
                    || (c.certified && !b.certified && c.dist <= b.dist + CANDIDATE_TIE)
            }
        };
        if better {
            best = Some(c);
        }
    };

    let distance = |q: Vec2| (q - point).norm();
    let constraint = |q: Vec2| boundary.eval_at(q);
    let cons: [&dyn Fn(Vec2) -> f64; 1] = [&constraint];
    let m = minimize_constrained(distance, point, &cons, cfg);
    let center = boundary.center();
    offer(counted.settle(point, m.x, center, m.converged, &cfg));

    if counted.eval(center) >= 0.0 {
        let radial = counted.bisect(center, point, cfg.x_tol);
        offer(counted.settle(point, radial, center, false, &cfg));
        if cfg.scan_rays > 0 {
            for theta in counted.scan(point, center, &cfg) {
                let q = counted.ray_crossing(center, theta, 2.0 * (point - center).norm(), &cfg);
                offer(counted.settle(point, q, center, true, &cfg));
            }
        }
    }

    let (q, value, certified) = match best {
        Some(c) => (c.point, c.value, c.certified),
        None => (m.x, counted.eval(m.x), false),
    };
    let converged = certified && value >= 0.0 && value <= cfg.boundary_tol;
    let evals = m.evals + counted.evals.get() + 1;
    if !converged {
        debug!(
            x = point.x,
            y = point.y,
            value,
            evals,
            "projection not certified; using nearest feasible candidate"
        );
    }
    Projection {
        point: q,
        value,
        evals,
        converged,
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    point: Vec2,
    value: f64,
    dist: f64,
    certified: bool,
}

/// Boundary evaluations with a running count.
struct Counted<'a, B: ?Sized> {
    boundary: &'a B,
    evals: Cell<usize>,
}

impl<'a, B: Boundary + ?Sized> Counted<'a, B> {
    fn new(boundary: &'a B) -> Self {
        Self {
            boundary,
            evals: Cell::new(0),
        }
    }

    fn eval(&self, q: Vec2) -> f64 {
        self.evals.set(self.evals.get() + 1);
        self.boundary.eval_at(q)
    }

    /// Feasible end of `[inside, outside]` once the bracket is within `tol`.
    fn bisect(&self, mut inside: Vec2, mut outside: Vec2, tol: f64) -> Vec2 {
        for _ in 0..BISECT_STEPS {
            if (outside - inside).norm() <= tol {
                break;
            }
            let mid = (inside + outside) * 0.5;
            if self.eval(mid) >= 0.0 {
                inside = mid;
            } else {
                outside = mid;
            }
        }
        inside
    }

    /// First contour crossing on the ray from `center` at angle `theta`, or
    /// the ray's far end when that is still inside.
    fn ray_crossing(&self, center: Vec2, theta: f64, reach: f64, cfg: &SolverCfg) -> Vec2 {
        let end = center + Vec2::new(theta.cos(), theta.sin()) * reach;
        if self.eval(end) >= 0.0 {
            return end;
        }
        self.bisect(center, end, cfg.x_tol)
    }

    /// Ray angles whose crossings are nearest to `point`, refined.
    ///
    /// The nearest contour point is no farther from `point` than the radial
    /// crossing, so rays of length `2 |point - center|` reach it.
    fn scan(&self, point: Vec2, center: Vec2, cfg: &SolverCfg) -> Vec<f64> {
        let rays = cfg.scan_rays;
        let reach = 2.0 * (point - center).norm();
        let step = TAU / rays as f64;
        let dists: Vec<f64> = (0..rays)
            .map(|k| (self.ray_crossing(center, k as f64 * step, reach, cfg) - point).norm())
            .collect();
        let mut minima: Vec<usize> = (0..rays)
            .filter(|&k| {
                let prev = dists[(k + rays - 1) % rays];
                let next = dists[(k + 1) % rays];
                dists[k] <= prev && dists[k] <= next
            })
            .collect();
        minima.sort_by(|&a, &b| dists[a].total_cmp(&dists[b]));
        minima.truncate(REFINE_SEEDS);
        minima
            .into_iter()
            .map(|k| {
                let theta = k as f64 * step;
                golden_min(
                    |t| (self.ray_crossing(center, t, reach, cfg) - point).norm(),
                    theta - step,
                    theta + step,
                    theta,
                    dists[k],
                )
            })
            .collect()
    }

    /// Feasible candidate on the contour near `q`.
    ///
    /// An infeasible `q` is first walked inwards; a strictly interior one is
    /// then bisected towards `point`, where the contour is closer still.
    fn settle(
        &self,
        point: Vec2,
        q: Vec2,
        toward: Vec2,
        certified: bool,
        cfg: &SolverCfg,
    ) -> Option<Candidate> {
        let mut q = q;
        let mut value = self.eval(q);
        if value.is_nan() {
            return None;
        }
        if value < 0.0 {
            let (p, v) = self.polish_inward(point, q, toward, cfg.feas_tol)?;
            q = p;
            value = v;
        }
        if value > cfg.boundary_tol {
            q = self.bisect(q, point, cfg.x_tol);
            value = self.eval(q);
        }
        Some(Candidate {
            point: q,
            value,
            dist: (q - point).norm(),
            certified,
        })
    }

    /// Step from `q` along `point → q` until `F >= 0`. When that direction is
    /// degenerate or never reaches the inside, step towards `fallback` and
    /// then towards the boundary center instead.
    fn polish_inward(&self, point: Vec2, q: Vec2, fallback: Vec2, start: f64) -> Option<(Vec2, f64)> {
        let dirs = [q - point, fallback - q, self.boundary.center() - q];
        dirs.into_iter()
            .filter_map(|d| d.try_normalize(f64::EPSILON))
            .find_map(|dir| {
                let mut t = start.max(f64::EPSILON);
                for _ in 0..POLISH_STEPS {
                    let cand = q + dir * t;
                    let v = self.eval(cand);
                    if v >= 0.0 {
                        return Some((cand, v));
                    }
                    t *= 2.0;
                }
                None
            })
    }
}

/// Golden-section search for the minimum of `g` on `[a, b]`. The best point
/// seen, seed included, is returned.
fn golden_min<G>(mut g: G, mut a: f64, mut b: f64, seed: f64, seed_val: f64) -> f64
where
    G: FnMut(f64) -> f64,
{
    const INV_PHI: f64 = 0.618_033_988_749_894_8;
    let (mut best, mut best_val) = (seed, seed_val);
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let (mut gc, mut gd) = (g(c), g(d));
    for _ in 0..GOLDEN_STEPS {
        for (t, v) in [(c, gc), (d, gd)] {
            if v < best_val {
                best = t;
                best_val = v;
            }
        }
        if b - a <= ANGLE_TOL {
            break;
        }
        if gc < gd {
            b = d;
            d = c;
            gd = gc;
            c = b - INV_PHI * (b - a);
            gc = g(c);
        } else {
            a = c;
            c = d;
            gc = gd;
            d = a + INV_PHI * (b - a);
            gd = g(d);
        }
    }
    best
}
