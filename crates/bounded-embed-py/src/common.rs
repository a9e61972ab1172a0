use bounded_embed::{EmbedError, Vec2};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

pub fn map_embed_err(err: EmbedError) -> PyErr {
    match err {
        EmbedError::Optimizer(inner) => PyRuntimeError::new_err(inner.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

pub fn check_same_len(xs: &[f64], ys: &[f64]) -> PyResult<()> {
    if xs.len() != ys.len() {
        return Err(PyValueError::new_err(format!(
            "x and y differ in length ({} vs {})",
            xs.len(),
            ys.len()
        )));
    }
    Ok(())
}

pub fn to_tuple(p: Vec2) -> (f64, f64) {
    (p.x, p.y)
}
