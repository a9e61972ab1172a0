//! Nelder–Mead downhill simplex in R².
//!
//! Standard coefficients (reflect 1, expand 2, contract ½, shrink ½).
//! Stops when the simplex diameter is below `x_tol` and the value spread is
//! below `f_tol`, or when the evaluation budget runs out.

use crate::Vec2;

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

#[derive(Clone, Copy, Debug)]
pub(crate) struct SimplexMin {
    pub x: Vec2,
    pub f: f64,
    pub evals: usize,
    pub converged: bool,
}

pub(crate) fn nelder_mead<F>(
    mut f: F,
    x0: Vec2,
    step: f64,
    x_tol: f64,
    f_tol: f64,
    max_evals: usize,
) -> SimplexMin
where
    F: FnMut(Vec2) -> f64,
{
    let mut v = [x0, x0 + Vec2::new(step, 0.0), x0 + Vec2::new(0.0, step)];
    let mut fv = [f(v[0]), f(v[1]), f(v[2])];
    let mut evals = 3;
    let mut converged = false;

    loop {
        sort3(&mut v, &mut fv);
        let diam = (v[1] - v[0]).norm().max((v[2] - v[0]).norm());
        let spread = (fv[2] - fv[0]).abs().max((fv[1] - fv[0]).abs());
        // NaN spreads never satisfy `<=`; the eval budget ends those runs.
        if diam <= x_tol && spread <= f_tol {
            converged = true;
            break;
        }
        if evals >= max_evals {
            break;
        }

        let c = (v[0] + v[1]) * 0.5;
        let xr = c + (c - v[2]) * REFLECT;
        let fr = f(xr);
        evals += 1;

        if fr < fv[0] {
            let xe = c + (c - v[2]) * EXPAND;
            let fe = f(xe);
            evals += 1;
            if fe < fr {
                v[2] = xe;
                fv[2] = fe;
            } else {
                v[2] = xr;
                fv[2] = fr;
            }
            continue;
        }
        if fr < fv[1] {
            v[2] = xr;
            fv[2] = fr;
            continue;
        }

        let (xc, fc, accept) = if fr < fv[2] {
            let xc = c + (xr - c) * CONTRACT;
            let fc = f(xc);
            (xc, fc, fc <= fr)
        } else {
            let xc = c + (v[2] - c) * CONTRACT;
            let fc = f(xc);
            (xc, fc, fc < fv[2])
        };
        evals += 1;
        if accept {
            v[2] = xc;
            fv[2] = fc;
            continue;
        }

        for i in 1..3 {
            v[i] = v[0] + (v[i] - v[0]) * SHRINK;
            fv[i] = f(v[i]);
        }
        evals += 2;
    }

    SimplexMin {
        x: v[0],
        f: fv[0],
        evals,
        converged,
    }
}

/// Order vertices by ascending value; NaN sorts last.
fn sort3(v: &mut [Vec2; 3], fv: &mut [f64; 3]) {
    let mut idx = [0usize, 1, 2];
    idx.sort_by(|&a, &b| fv[a].total_cmp(&fv[b]));
    let (v0, f0) = (*v, *fv);
    for (k, &i) in idx.iter().enumerate() {
        v[k] = v0[i];
        fv[k] = f0[i];
    }
}
