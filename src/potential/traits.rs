//! Traits for potential evaluation.

use crate::space::{Boundary, Vector};
use crate::system::RingSystem;

/// Evaluates the external potential acting on every bead.
///
/// Forces are indexed by global bead index (`ring * n_beads + bead`) and are
/// only valid after `compute_all` was called with `want_forces = true`.
pub trait PotentialCompute<const D: usize> {
    /// Returns the potential energy of the whole system.
    fn compute_all<B: Boundary<D>>(&mut self, system: &RingSystem<D, B>, want_forces: bool) -> f64;

    fn forces(&self) -> &[Vector<D>];
}
