//! Built-in implicit boundary functions.
//!
//! Contract shared by every shape: `(x, y, shape params..., center_x, center_y) -> F`
//! with `F >= 0` inside (or on) the contour and `F < 0` outside.

use crate::coords::{cartesian_to_polar, translate};

/// Offset in the heart-curve denominator; `|sin θ| <= 1 < 7/5` keeps it nonzero.
pub const HEART_OFFSET: f64 = 7.0 / 5.0;

/// Disk of `radius` around `(center_x, center_y)`: `F = radius - r`.
#[inline]
pub fn circle(x: f64, y: f64, radius: f64, center_x: f64, center_y: f64) -> f64 {
    let (xt, yt) = translate(x, y, center_x, center_y);
    let (r, _) = cartesian_to_polar(xt, yt);
    radius - r
}

/// Polar heart curve (MathWorld "Heart Curve", sixth form) scaled by `size`:
///
/// `F = sin θ · sqrt(|cos θ|) / (sin θ + 7/5) - 2 sin θ - r/size + 2`.
///
/// The cusp points down (θ = -π/2 reaches `r = 4·size`); the lobes sit above
/// the center.
#[inline]
pub fn heart(x: f64, y: f64, size: f64, center_x: f64, center_y: f64) -> f64 {
    let (xt, yt) = translate(x, y, center_x, center_y);
    let (r, t) = cartesian_to_polar(xt, yt);
    let (s, c) = t.sin_cos();
    s * c.abs().sqrt() / (s + HEART_OFFSET) - 2.0 * s - r / size + 2.0
}

/// Boundary radius of the heart along direction `theta` (unit size).
#[inline]
pub fn heart_radius(theta: f64) -> f64 {
    let (s, c) = theta.sin_cos();
    s * c.abs().sqrt() / (s + HEART_OFFSET) - 2.0 * s + 2.0
}
