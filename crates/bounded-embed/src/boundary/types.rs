//! Boundary trait and the shape registry.
//!
//! - `Boundary`: total function of `(x, y)` plus a declared center.
//! - `Shape`: tagged built-in shapes with parameters bound at construction;
//!   deserialises from a loose parameter bag (unknown keys ignored).
//! - `Implicit`: any closure, for shapes outside the registry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::shapes;
use crate::{EmbedError, Vec2};

/// Implicit planar boundary: `eval(x, y) >= 0` inside, `< 0` outside.
///
/// Implementors must be total (no panics, no error paths) and pure.
pub trait Boundary: Sync {
    fn eval(&self, x: f64, y: f64) -> f64;

    /// Declared center; used to place a lone observation.
    fn center(&self) -> Vec2;

    #[inline]
    fn eval_at(&self, p: Vec2) -> f64 {
        self.eval(p.x, p.y)
    }

    #[inline]
    fn contains(&self, p: Vec2) -> bool {
        self.eval_at(p) >= 0.0
    }

    /// Elementwise evaluation over a point set.
    fn eval_points(&self, pts: &[Vec2]) -> Vec<f64> {
        pts.iter().map(|p| self.eval_at(*p)).collect()
    }

    /// Elementwise evaluation over coordinate columns (truncates to the shorter one).
    fn eval_xy(&self, xs: &[f64], ys: &[f64]) -> Vec<f64> {
        xs.iter().zip(ys).map(|(&x, &y)| self.eval(x, y)).collect()
    }
}

impl<B: Boundary + ?Sized> Boundary for &B {
    #[inline]
    fn eval(&self, x: f64, y: f64) -> f64 {
        (**self).eval(x, y)
    }
    #[inline]
    fn center(&self) -> Vec2 {
        (**self).center()
    }
}

fn one() -> f64 {
    1.0
}

/// Built-in shapes.
///
/// Deserialises from maps such as `{"shape": "heart", "size": 2.0}`; missing
/// parameters take their defaults (unit size, origin center) and unrecognised
/// keys are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Circle {
        #[serde(default = "one")]
        radius: f64,
        #[serde(default)]
        center_x: f64,
        #[serde(default)]
        center_y: f64,
    },
    Heart {
        #[serde(default = "one")]
        size: f64,
        #[serde(default)]
        center_x: f64,
        #[serde(default)]
        center_y: f64,
    },
}

impl Default for Shape {
    fn default() -> Self {
        Shape::circle(1.0, 0.0, 0.0)
    }
}

impl Shape {
    /// Registered shape names, in registry order.
    pub const NAMES: [&'static str; 2] = ["circle", "heart"];

    #[inline]
    pub fn circle(radius: f64, center_x: f64, center_y: f64) -> Self {
        Shape::Circle {
            radius,
            center_x,
            center_y,
        }
    }

    #[inline]
    pub fn heart(size: f64, center_x: f64, center_y: f64) -> Self {
        Shape::Heart {
            size,
            center_x,
            center_y,
        }
    }

    /// Build a shape from a name and a flat parameter bag.
    ///
    /// `radius` and `size` are accepted interchangeably as the scale of either
    /// shape; other unknown keys are ignored.
    pub fn from_params(name: &str, params: &BTreeMap<String, f64>) -> Result<Self, EmbedError> {
        let get = |k: &str| params.get(k).copied();
        let center_x = get("center_x").unwrap_or(0.0);
        let center_y = get("center_y").unwrap_or(0.0);
        match name.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(Shape::circle(
                get("radius").or_else(|| get("size")).unwrap_or(1.0),
                center_x,
                center_y,
            )),
            "heart" => Ok(Shape::heart(
                get("size").or_else(|| get("radius")).unwrap_or(1.0),
                center_x,
                center_y,
            )),
            _ => Err(EmbedError::UnknownShape(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "circle",
            Shape::Heart { .. } => "heart",
        }
    }

    /// Radius for circles, size for hearts.
    pub fn scale(&self) -> f64 {
        match *self {
            Shape::Circle { radius, .. } => radius,
            Shape::Heart { size, .. } => size,
        }
    }
}

impl Boundary for Shape {
    #[inline]
    fn eval(&self, x: f64, y: f64) -> f64 {
        match *self {
            Shape::Circle {
                radius,
                center_x,
                center_y,
            } => shapes::circle(x, y, radius, center_x, center_y),
            Shape::Heart {
                size,
                center_x,
                center_y,
            } => shapes::heart(x, y, size, center_x, center_y),
        }
    }

    #[inline]
    fn center(&self) -> Vec2 {
        match *self {
            Shape::Circle {
                center_x, center_y, ..
            }
            | Shape::Heart {
                center_x, center_y, ..
            } => Vec2::new(center_x, center_y),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.center();
        match self {
            Shape::Circle { radius, .. } => {
                write!(f, "circle(radius={}, center=({}, {}))", radius, c.x, c.y)
            }
            Shape::Heart { size, .. } => {
                write!(f, "heart(size={}, center=({}, {}))", size, c.x, c.y)
            }
        }
    }
}

/// Closure-backed boundary for shapes outside the registry.
#[derive(Clone, Copy)]
pub struct Implicit<F> {
    f: F,
    center: Vec2,
}

impl<F> Implicit<F>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    pub fn new(f: F, center: Vec2) -> Self {
        Self { f, center }
    }
}

impl<F> Boundary for Implicit<F>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    #[inline]
    fn eval(&self, x: f64, y: f64) -> f64 {
        (self.f)(x, y)
    }
    #[inline]
    fn center(&self) -> Vec2 {
        self.center
    }
}

impl<F> fmt::Debug for Implicit<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implicit")
            .field("center", &self.center)
            .finish_non_exhaustive()
    }
}
