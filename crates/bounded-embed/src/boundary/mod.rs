//! Implicit boundary functions (F >= 0 inside).
//!
//! Purpose
//! - Describe the outer contour an embedding must respect as a total scalar
//!   function of the plane; parameters (scale, center) are bound once and the
//!   resulting value takes only `(x, y)`.
//! - Built-ins: circle and heart curve. Anything else goes through `Implicit`.
//!
//! Code cross-refs: `project::project_to_boundary`, `driver::run`

mod shapes;
mod types;

pub use shapes::{circle, heart, heart_radius, HEART_OFFSET};
pub use types::{Boundary, Implicit, Shape};
