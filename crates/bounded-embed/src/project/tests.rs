use rand::{rngs::StdRng, Rng, SeedableRng};

use super::*;
use crate::boundary::{heart_radius, Boundary, Implicit, Shape};
use crate::Vec2;

fn angle(p: Vec2) -> f64 {
    p.y.atan2(p.x)
}

#[test]
fn unit_circle_projection_is_radial() {
    let unit = Shape::default();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let th: f64 = rng.gen_range(-3.1..3.1);
        let r: f64 = rng.gen_range(1.01..20.0);
        let p = Vec2::new(r * th.cos(), r * th.sin());
        let q = project_to_boundary(p, &unit);
        assert!((q.norm() - 1.0).abs() < 1e-3, "p={:?} q={:?}", p, q);
        assert!((angle(q) - angle(p)).abs() < 1e-3, "p={:?} q={:?}", p, q);
        assert!(unit.eval_at(q) >= -1e-6);
    }
}

#[test]
fn translated_circle_projection() {
    let c = Shape::circle(2.0, 3.0, -1.0);
    let p = Vec2::new(3.0, 4.0);
    let rep = project_with_cfg(p, &c, SolverCfg::default());
    assert!((rep.point - Vec2::new(3.0, 1.0)).norm() < 1e-4, "{:?}", rep);
    assert!(rep.value >= 0.0 && rep.value < 1e-6);
}

#[test]
fn inside_points_are_returned_unchanged() {
    let c = Shape::circle(1.0, 0.0, 0.0);
    let h = Shape::heart(1.0, 0.0, 0.0);
    for p in [Vec2::new(0.0, 0.0), Vec2::new(0.3, -0.4), Vec2::new(-0.99, 0.0)] {
        assert_eq!(project_to_boundary(p, &c), p);
        assert_eq!(project_to_boundary(p, &h), p);
    }
}

#[test]
fn projecting_twice_is_stable() {
    let c = Shape::default();
    let on = Vec2::new(0.6, 0.8);
    assert!((project_to_boundary(on, &c) - on).norm() < 1e-6);

    let h = Shape::heart(1.5, 0.5, 0.5);
    for p in [Vec2::new(6.0, 0.0), Vec2::new(-4.0, -3.0)] {
        let q1 = project_to_boundary(p, &h);
        let q2 = project_to_boundary(q1, &h);
        assert!((q2 - q1).norm() < 1e-6);
    }
}

/// Distance from `p` to a dense polar sampling of the unit heart (an upper
/// bound on the true distance, tight to the sampling step).
fn heart_scan_distance(samples: &[Vec2], p: Vec2) -> f64 {
    samples
        .iter()
        .map(|s| (s - p).norm())
        .fold(f64::INFINITY, f64::min)
}

fn heart_samples(n: usize) -> Vec<Vec2> {
    (0..n)
        .map(|k| {
            let t = -std::f64::consts::PI + k as f64 * std::f64::consts::TAU / n as f64;
            let r = heart_radius(t);
            Vec2::new(r * t.cos(), r * t.sin())
        })
        .collect()
}

#[test]
fn heart_projection_matches_dense_boundary_scan() {
    let h = Shape::heart(1.0, 0.0, 0.0);
    let samples = heart_samples(200_000);
    let mut rng = StdRng::seed_from_u64(2024);
    let mut points = vec![
        // below the cusp, far and near
        Vec2::new(18.33, -29.58),
        Vec2::new(2.35, -7.42),
        Vec2::new(0.0, -6.0),
        // above the notch, nearest point on the right lobe
        Vec2::new(0.528, 4.48),
        Vec2::new(-0.3, 0.8),
        Vec2::new(3.0, 0.0),
        Vec2::new(-3.0, -1.0),
    ];
    while points.len() < 80 {
        let p = Vec2::new(rng.gen_range(-8.0..8.0), rng.gen_range(-8.0..8.0));
        if h.eval_at(p) < 0.0 {
            points.push(p);
        }
    }
    for p in points {
        assert!(h.eval_at(p) < 0.0, "p={:?}", p);
        let best = heart_scan_distance(&samples, p);
        let rep = project_with_cfg(p, &h, SolverCfg::default());
        let d = (rep.point - p).norm();
        assert!(d <= best + 1e-3, "p={:?} q={:?} d={} best={}", p, rep.point, d, best);
        assert!(rep.value >= 0.0, "p={:?} {:?}", p, rep);
        assert!(rep.value <= 1e-6, "strictly interior: p={:?} {:?}", p, rep);
    }
}

#[test]
fn far_below_cusp_lands_on_the_tip() {
    let h = Shape::heart(1.0, 0.0, 0.0);
    let rep = project_with_cfg(Vec2::new(18.33, -29.58), &h, SolverCfg::default());
    assert!((rep.point - Vec2::new(0.0, -4.0)).norm() < 1e-3, "{:?}", rep);
    assert!(rep.converged);
}

#[test]
fn hair_outside_circle_comes_back_inside() {
    let unit = Shape::default();
    let p = Vec2::new(1.0 + 1e-12, 0.0);
    let rep = project_with_cfg(p, &unit, SolverCfg::default());
    assert!(rep.value >= 0.0, "{:?}", rep);
    assert!((rep.point - Vec2::new(1.0, 0.0)).norm() < 1e-6, "{:?}", rep);

    let local = SolverCfg {
        scan_rays: 0,
        ..SolverCfg::default()
    };
    let rep = project_with_cfg(p, &unit, local);
    assert!(rep.value >= 0.0, "{:?}", rep);
    assert!((rep.point - Vec2::new(1.0, 0.0)).norm() < 1e-6, "{:?}", rep);
}

#[test]
fn closure_boundary_square() {
    // |x|, |y| <= 1: the nearest point to (3, 0.5) is (1, 0.5).
    let square = Implicit::new(|x: f64, y: f64| 1.0 - x.abs().max(y.abs()), Vec2::zeros());
    let q = project_to_boundary(Vec2::new(3.0, 0.5), &square);
    assert!((q - Vec2::new(1.0, 0.5)).norm() < 1e-4, "q={:?}", q);
    assert!(square.eval_at(q) >= 0.0);
}

#[test]
fn two_linear_constraints_meet_at_corner() {
    let target = Vec2::new(2.0, 2.0);
    let cx = |z: Vec2| 1.0 - z.x;
    let cy = |z: Vec2| 0.5 - z.y;
    let cons: [&dyn Fn(Vec2) -> f64; 2] = [&cx, &cy];
    let m = minimize_constrained(|z: Vec2| (z - target).norm(), target, &cons, SolverCfg::default());
    assert!((m.x - Vec2::new(1.0, 0.5)).norm() < 1e-4, "{:?}", m);
    assert!(m.violation < 1e-6);
}

#[test]
fn exhausted_budget_still_returns_an_iterate() {
    let cfg = SolverCfg {
        max_evals: 5,
        max_outer: 1,
        scan_rays: 0,
        ..SolverCfg::default()
    };
    let rep = project_with_cfg(Vec2::new(10.0, 0.0), &Shape::default(), cfg);
    assert!(!rep.converged);
    assert!(rep.point.x.is_finite() && rep.point.y.is_finite());
    // still feasible, and on the contour thanks to the radial crossing
    assert!(rep.value >= 0.0 && rep.value <= cfg.boundary_tol, "{:?}", rep);
}
