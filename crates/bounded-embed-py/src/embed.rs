//! Full constrained t-SNE run from Python.

use std::collections::BTreeMap;

use crate::common::{map_embed_err, to_tuple};
use bounded_embed::api::{run, Metric, Observations, Shape, Tsne, TsneCfg};
use nalgebra::DMatrix;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Embed the rows of `x` inside the named shape and return one `(x, y)` per row.
///
/// `params` holds the shape parameters (`radius`/`size`, `center_x`, `center_y`).
#[pyfunction]
#[pyo3(signature = (x, shape="heart", params=None, perplexity=50.0, metric="cosine", n_jobs=0, seed=42))]
pub fn embed(
    py: Python<'_>,
    x: Vec<Vec<f64>>,
    shape: &str,
    params: Option<BTreeMap<String, f64>>,
    perplexity: f64,
    metric: &str,
    n_jobs: usize,
    seed: u64,
) -> PyResult<Vec<(f64, f64)>> {
    let shape = Shape::from_params(shape, &params.unwrap_or_default()).map_err(map_embed_err)?;
    let metric = match metric {
        "cosine" => Metric::Cosine,
        "euclidean" => Metric::Euclidean,
        other => return Err(PyValueError::new_err(format!("unknown metric: {other}"))),
    };
    let dims = x.first().map_or(0, Vec::len);
    if x.iter().any(|row| row.len() != dims) {
        return Err(PyValueError::new_err("rows of x differ in length"));
    }
    let matrix = DMatrix::from_fn(x.len(), dims, |i, j| x[i][j]);
    let cfg = TsneCfg {
        perplexity,
        metric,
        n_jobs,
        seed,
        ..TsneCfg::default()
    };
    let points = py.allow_threads(move || {
        let mut obs = Observations::new(matrix);
        let mut tsne = Tsne::new(cfg);
        run(&mut obs, &shape, &mut tsne)
    });
    Ok(points.map_err(map_embed_err)?.into_iter().map(to_tuple).collect())
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(embed, m)?)?;
    Ok(())
}
