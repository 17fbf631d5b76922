//! Harmonic springs between neighbouring beads and the sampling tether.

use crate::coefficients::RingParameters;
use crate::space::{Boundary, Vector};
use crate::system::RingPolymer;

/// Spring constant `m kappa` and tether constant `m tau` of one ring type.
///
/// Bead `i` is bonded to bead `(i+1) % N`. For `N = 2` both bonds join the
/// same pair, so the pair feels twice the spring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingSprings {
    pub spring_constant: f64,
    pub tether_constant: f64,
}

impl RingSprings {
    pub fn new(params: &RingParameters) -> Self {
        Self {
            spring_constant: params.spring_constant(),
            tether_constant: params.bead_mass * params.sample_tether_omega2(),
        }
    }

    /// Spring energy of the ring.
    pub fn energy<const D: usize, B: Boundary<D>>(&self, ring: &RingPolymer<D>, boundary: &B) -> f64 {
        let n = ring.n_beads();
        if n < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let mut dr = ring.beads[(i + 1) % n].position - ring.beads[i].position;
            boundary.nearest_image(&mut dr);
            sum += dr.norm_squared();
        }
        0.5 * self.spring_constant * sum
    }

    /// Add the spring forces to `forces` (one entry per bead) and return the energy.
    pub fn add_forces<const D: usize, B: Boundary<D>>(
        &self,
        ring: &RingPolymer<D>,
        boundary: &B,
        forces: &mut [Vector<D>],
    ) -> f64 {
        let n = ring.n_beads();
        if n < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            let mut dr = ring.beads[j].position - ring.beads[i].position;
            boundary.nearest_image(&mut dr);
            sum += dr.norm_squared();
            let f = self.spring_constant * dr;
            forces[i] += f;
            forces[j] -= f;
        }
        0.5 * self.spring_constant * sum
    }

    /// Take the tether force `-m tau (r - site)` back out of `forces`.
    ///
    /// Used when the exact propagator already integrates the tether.
    pub fn remove_tether<const D: usize, B: Boundary<D>>(
        &self,
        ring: &RingPolymer<D>,
        site: &Vector<D>,
        boundary: &B,
        forces: &mut [Vector<D>],
    ) {
        if self.tether_constant == 0.0 {
            return;
        }
        for (f, bead) in forces.iter_mut().zip(&ring.beads) {
            let mut dr = bead.position - site;
            boundary.nearest_image(&mut dr);
            *f += self.tether_constant * dr;
        }
    }
}
