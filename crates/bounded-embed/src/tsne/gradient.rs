//! Exact KL-divergence gradient for the Student-t output kernel.

use rayon::prelude::*;

use super::affinity::Affinities;
use crate::Vec2;

/// `grad_i = 4 Σ_j (exaggeration · P_ij − q_ij) · w_ij · (y_i − y_j)` with
/// `w_ij = 1 / (1 + |y_i − y_j|²)` and `q_ij = w_ij / Z`.
///
/// Also returns `KL(P || Q)` of the unexaggerated affinities.
pub(crate) fn kl_gradient(p: &Affinities, y: &[Vec2], exaggeration: f64, grad: &mut [Vec2]) -> f64 {
    let n = p.n;
    debug_assert_eq!(y.len(), n);
    debug_assert_eq!(grad.len(), n);

    let z: f64 = (0..n)
        .into_par_iter()
        .map(|i| {
            let yi = y[i];
            y.iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, yj)| 1.0 / (1.0 + (yi - yj).norm_squared()))
                .sum::<f64>()
        })
        .sum();
    let z = z.max(f64::MIN_POSITIVE);

    grad.par_iter_mut()
        .enumerate()
        .map(|(i, g)| {
            let yi = y[i];
            let row = p.row(i);
            let mut acc = Vec2::zeros();
            let mut kl = 0.0;
            for (j, (&pij, yj)) in row.iter().zip(y).enumerate() {
                if j == i {
                    continue;
                }
                let diff = yi - yj;
                let w = 1.0 / (1.0 + diff.norm_squared());
                let q = (w / z).max(f64::MIN_POSITIVE);
                acc += diff * ((exaggeration * pij - q) * w);
                if pij > 0.0 {
                    kl += pij * (pij / q).ln();
                }
            }
            *g = acc * 4.0;
            kl
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_point_affinities() -> Affinities {
        Affinities {
            n: 2,
            p: vec![0.0, 0.5, 0.5, 0.0],
        }
    }

    #[test]
    fn two_points_balance_at_zero_kl() {
        // With two points q_01 = q_10 = 1/2 regardless of distance: KL = 0, gradient = 0.
        let p = two_point_affinities();
        let y = [Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0)];
        let mut g = [Vec2::zeros(); 2];
        let kl = kl_gradient(&p, &y, 1.0, &mut g);
        assert!(kl.abs() < 1e-12);
        assert!(g[0].norm() < 1e-12 && g[1].norm() < 1e-12);
    }

    #[test]
    fn exaggeration_attracts() {
        let p = two_point_affinities();
        let y = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        let mut g = [Vec2::zeros(); 2];
        kl_gradient(&p, &y, 4.0, &mut g);
        // descent direction −grad pulls the points together
        assert!(g[0].x < 0.0 && g[1].x > 0.0);
        assert!((g[0] + g[1]).norm() < 1e-12);
    }

    #[test]
    fn matches_finite_differences() {
        let n = 5;
        let mut p = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    p[i * n + j] = (1 + (i + j) % 3) as f64;
                }
            }
        }
        let s: f64 = p.iter().sum();
        p.iter_mut().for_each(|v| *v /= s);
        let aff = Affinities { n, p };
        let y: Vec<Vec2> = (0..n)
            .map(|i| Vec2::new((i as f64 * 1.3).sin(), (i as f64 * 0.7).cos()))
            .collect();
        let mut g = vec![Vec2::zeros(); n];
        kl_gradient(&aff, &y, 1.0, &mut g);

        let h = 1e-6;
        let mut scratch = vec![Vec2::zeros(); n];
        for k in 0..n {
            for axis in 0..2 {
                let mut yp = y.clone();
                let mut ym = y.clone();
                yp[k][axis] += h;
                ym[k][axis] -= h;
                let fp = kl_gradient(&aff, &yp, 1.0, &mut scratch);
                let fm = kl_gradient(&aff, &ym, 1.0, &mut scratch);
                let fd = (fp - fm) / (2.0 * h);
                assert!((fd - g[k][axis]).abs() < 1e-5, "k={} axis={} fd={} g={}", k, axis, fd, g[k][axis]);
            }
        }
    }
}
