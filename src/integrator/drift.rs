//! Per-mode net-momentum bookkeeping that stops the lattice of rings from
//! drifting as a whole.

use crate::space::{Boundary, Vector};
use crate::system::RingSystem;

/// Running net momentum and total mass of each staging mode across all rings.
///
/// `net_momentum[i]` always equals the sum over rings of `m_eff v_i`; the
/// thermostat and the kick report every change through [`MomentumDrift::add`].
#[derive(Clone, Debug)]
pub struct MomentumDrift<const D: usize> {
    net_momentum: Vec<Vector<D>>,
    total_mass: Vec<f64>,
}

impl<const D: usize> MomentumDrift<D> {
    pub fn new(n_beads: usize) -> Self {
        Self {
            net_momentum: vec![Vector::<D>::zeros(); n_beads],
            total_mass: vec![0.0; n_beads],
        }
    }

    /// Recompute both accumulators from the current velocities.
    pub fn rebuild<B: Boundary<D>>(&mut self, system: &RingSystem<D, B>, m_scale: &[f64]) {
        self.net_momentum.fill(Vector::<D>::zeros());
        self.total_mass.fill(0.0);
        for ring in &system.rings {
            for (i, bead) in ring.beads.iter().enumerate() {
                let m_eff = bead.mass * m_scale[i];
                self.net_momentum[i] += m_eff * bead.velocity;
                self.total_mass[i] += m_eff;
            }
        }
    }

    #[inline]
    pub fn add(&mut self, mode: usize, dp: Vector<D>) {
        self.net_momentum[mode] += dp;
    }

    /// Velocity of the mode's center of mass, `P_i / M_i`.
    #[inline]
    pub fn mean_velocity(&self, mode: usize) -> Vector<D> {
        self.net_momentum[mode] / self.total_mass[mode]
    }

    pub fn net_momentum(&self) -> &[Vector<D>] {
        &self.net_momentum
    }

    pub fn total_mass(&self) -> &[f64] {
        &self.total_mass
    }
}
