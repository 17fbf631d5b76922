//! External fields acting on each bead independently.

use super::traits::PotentialCompute;
use crate::coefficients::RingParameters;
use crate::space::{Boundary, Vector};
use crate::system::RingSystem;

/// No external potential; the rings only feel their own springs.
#[derive(Clone, Debug, Default)]
pub struct FreeField<const D: usize> {
    forces: Vec<Vector<D>>,
}

impl<const D: usize> FreeField<D> {
    pub fn new() -> Self {
        Self { forces: Vec::new() }
    }
}

impl<const D: usize> PotentialCompute<D> for FreeField<D> {
    fn compute_all<B: Boundary<D>>(&mut self, system: &RingSystem<D, B>, want_forces: bool) -> f64 {
        if want_forces {
            self.forces.clear();
            self.forces.resize(system.n_leaf(), Vector::<D>::zeros());
        }
        0.0
    }

    fn forces(&self) -> &[Vector<D>] {
        &self.forces
    }
}

/// Separable quartic well around each ring's site.
///
/// Every Cartesian component `x` of a bead's displacement from its site
/// contributes `k2/2 x^2 + k3/6 x^3 + k4/24 x^4`. The coefficients are per
/// bead; [`Anharmonic234::per_bead`] builds them from particle-level values.
#[derive(Clone, Debug)]
pub struct Anharmonic234<const D: usize> {
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
    sites: Vec<Vector<D>>,
    forces: Vec<Vector<D>>,
}

impl<const D: usize> Anharmonic234<D> {
    pub fn new(k2: f64, k3: f64, k4: f64, sites: Vec<Vector<D>>) -> Self {
        Self {
            k2,
            k3,
            k4,
            sites,
            forces: Vec::new(),
        }
    }

    pub fn harmonic(k2: f64, sites: Vec<Vector<D>>) -> Self {
        Self::new(k2, 0.0, 0.0, sites)
    }

    /// Split the particle potential `m omega^2/2 x^2 + k3/6 x^3 + k4/24 x^4`
    /// over the `N` beads of a ring. The quadratic part uses the tether of
    /// the ring's spring model, so a continuum ring sees the exact harmonic
    /// propagator.
    pub fn per_bead(params: &RingParameters, k3: f64, k4: f64, sites: Vec<Vector<D>>) -> Self {
        let n = params.n_beads as f64;
        let k2 = params.bead_mass * params.tether_omega2(params.omega2);
        Self::new(k2, k3 / n, k4 / n, sites)
    }

    /// Sites taken from bead 0 of every ring.
    pub fn centered_on<B: Boundary<D>>(k2: f64, k3: f64, k4: f64, system: &RingSystem<D, B>) -> Self {
        Self::new(k2, k3, k4, system.anchor_positions())
    }

    pub fn sites(&self) -> &[Vector<D>] {
        &self.sites
    }

    #[inline]
    fn energy_1d(&self, x: f64) -> f64 {
        let x2 = x * x;
        x2 * (0.5 * self.k2 + x * (self.k3 / 6.0 + x * self.k4 / 24.0))
    }

    #[inline]
    fn force_1d(&self, x: f64) -> f64 {
        -x * (self.k2 + x * (0.5 * self.k3 + x * self.k4 / 6.0))
    }
}

impl<const D: usize> PotentialCompute<D> for Anharmonic234<D> {
    fn compute_all<B: Boundary<D>>(&mut self, system: &RingSystem<D, B>, want_forces: bool) -> f64 {
        if want_forces {
            self.forces.clear();
            self.forces.reserve(system.n_leaf());
        }
        let mut energy = 0.0;
        for (ring, site) in system.rings.iter().zip(&self.sites) {
            for bead in &ring.beads {
                let mut dr = bead.position - site;
                system.boundary.nearest_image(&mut dr);
                energy += dr.iter().map(|&x| self.energy_1d(x)).sum::<f64>();
                if want_forces {
                    let f = dr.map(|x| self.force_1d(x));
                    self.forces.push(f);
                }
            }
        }
        energy
    }

    fn forces(&self) -> &[Vector<D>] {
        &self.forces
    }
}
