//! Potential module - external forces on the beads and the ring springs.

mod field;
mod springs;
mod traits;

pub use field::{Anharmonic234, FreeField};
pub use springs::RingSprings;
pub use traits::PotentialCompute;
