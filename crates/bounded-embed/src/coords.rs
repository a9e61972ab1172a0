//! Coordinate helpers shared by the boundary shapes.
//!
//! Angles follow the `atan2` convention: theta ∈ (-π, π], and the origin maps
//! to `(0, 0)`.

use crate::Vec2;

/// `(x, y) ↦ (r, θ)` with `r = sqrt(x² + y²)` and `θ = atan2(y, x)`.
#[inline]
pub fn cartesian_to_polar(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), y.atan2(x))
}

/// `(r, θ) ↦ (r cos θ, r sin θ)`.
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> (f64, f64) {
    let (s, c) = theta.sin_cos();
    (r * c, r * s)
}

/// Move the origin to `(center_x, center_y)`.
#[inline]
pub fn translate(x: f64, y: f64, center_x: f64, center_y: f64) -> (f64, f64) {
    (x - center_x, y - center_y)
}

/// Polar coordinates of `p` relative to `center`.
#[inline]
pub fn polar_about(p: Vec2, center: Vec2) -> (f64, f64) {
    let (x, y) = translate(p.x, p.y, center.x, center.y);
    cartesian_to_polar(x, y)
}
