//! PyO3 bindings for `bounded-embed`.
//!
//! Notes
//! - Keep bindings thin: plain floats, lists and tuples in and out. NumPy
//!   conversion happens in the Python wrapper.
//! - Element-wise boundary functions take two equal-length coordinate lists,
//!   mirroring how notebooks evaluate a contour on a grid.

use pyo3::prelude::*;

mod common;
mod embed;
mod shapes;

#[pymodule]
fn bounded_embed_native(_py: Python, m: &PyModule) -> PyResult<()> {
    shapes::register(m)?;
    embed::register(m)?;
    m.add("__version__", bounded_embed::VERSION)?;
    Ok(())
}
