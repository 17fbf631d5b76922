//! Space module - vectors and periodic boundaries.

mod boundary;

pub use boundary::{Boundary, Nonperiodic, PeriodicBox};

/// Position, velocity and force vectors in `D` dimensions.
pub type Vector<const D: usize> = nalgebra::SVector<f64, D>;
