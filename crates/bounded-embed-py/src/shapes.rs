//! Boundary functions and single-point projection.

use crate::common::{check_same_len, to_tuple};
use bounded_embed::api::{project_to_boundary, Boundary, Shape};
use bounded_embed::Vec2;
use pyo3::prelude::*;

/// Circle boundary value at each `(x[i], y[i])`; positive inside.
#[pyfunction]
#[pyo3(signature = (x, y, radius=1.0, center_x=0.0, center_y=0.0))]
pub fn boundary_circle(
    x: Vec<f64>,
    y: Vec<f64>,
    radius: f64,
    center_x: f64,
    center_y: f64,
) -> PyResult<Vec<f64>> {
    check_same_len(&x, &y)?;
    Ok(Shape::circle(radius, center_x, center_y).eval_xy(&x, &y))
}

/// Heart boundary value at each `(x[i], y[i])`; positive inside.
#[pyfunction]
#[pyo3(signature = (x, y, size=1.0, center_x=0.0, center_y=0.0))]
pub fn boundary_heart(
    x: Vec<f64>,
    y: Vec<f64>,
    size: f64,
    center_x: f64,
    center_y: f64,
) -> PyResult<Vec<f64>> {
    check_same_len(&x, &y)?;
    Ok(Shape::heart(size, center_x, center_y).eval_xy(&x, &y))
}

#[pyfunction]
#[pyo3(signature = (point, radius=1.0, center_x=0.0, center_y=0.0))]
pub fn closest_point_in_circle(
    point: (f64, f64),
    radius: f64,
    center_x: f64,
    center_y: f64,
) -> (f64, f64) {
    let shape = Shape::circle(radius, center_x, center_y);
    to_tuple(project_to_boundary(Vec2::new(point.0, point.1), &shape))
}

#[pyfunction]
#[pyo3(signature = (point, size=1.0, center_x=0.0, center_y=0.0))]
pub fn closest_point_in_heart(
    point: (f64, f64),
    size: f64,
    center_x: f64,
    center_y: f64,
) -> (f64, f64) {
    let shape = Shape::heart(size, center_x, center_y);
    to_tuple(project_to_boundary(Vec2::new(point.0, point.1), &shape))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(boundary_circle, m)?)?;
    m.add_function(wrap_pyfunction!(boundary_heart, m)?)?;
    m.add_function(wrap_pyfunction!(closest_point_in_circle, m)?)?;
    m.add_function(wrap_pyfunction!(closest_point_in_heart, m)?)?;
    Ok(())
}
