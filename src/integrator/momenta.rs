//! Initial momenta: Maxwell-Boltzmann draws, net-momentum removal and
//! rescaling to a target temperature.

use log::{info, warn};

use super::baoab::BaoabIntegrator;
use crate::error::{PimdError, Result};
use crate::potential::PotentialCompute;
use crate::random::RandomSource;
use crate::space::{Boundary, Vector};

impl<const D: usize, P, B, R> BaoabIntegrator<D, P, B, R>
where
    P: PotentialCompute<D>,
    B: Boundary<D>,
    R: RandomSource,
{
    /// Draw each mode velocity from the Maxwell-Boltzmann distribution of its
    /// mass at the thermostat temperature.
    pub fn randomize_momenta(&mut self) {
        let temperature = self.params.temperature;
        let m_scale = self.transform.m_scale();
        for ring in self.system.rings.iter_mut() {
            for (bead, s) in ring.beads.iter_mut().zip(m_scale) {
                let sigma = (temperature / (bead.mass * s)).sqrt();
                bead.velocity = sigma * Vector::<D>::from_fn(|_, _| self.random.next_gaussian());
            }
        }
        if self.drift.is_some() {
            self.shift_momenta();
        } else {
            self.compute_kinetic_energy();
        }
    }

    /// Subtract from every mode the mass-weighted mean velocity of that mode
    /// over all rings, then rebuild the drift accumulators.
    pub fn shift_momenta(&mut self) {
        if self.system.n_rings() > 1 {
            let m_scale = self.transform.m_scale();
            for (i, s) in m_scale.iter().enumerate() {
                let mut momentum = Vector::<D>::zeros();
                let mut mass = 0.0;
                for ring in &self.system.rings {
                    let m_eff = ring.beads[i].mass * s;
                    momentum += m_eff * ring.beads[i].velocity;
                    mass += m_eff;
                }
                let mean = momentum / mass;
                for ring in self.system.rings.iter_mut() {
                    ring.beads[i].velocity -= mean;
                }
            }
        }
        self.rebuild_drift();
        self.compute_kinetic_energy();
    }

    /// Rescale each Cartesian component of the velocities so that it carries
    /// `temperature` on average.
    ///
    /// A dimension without any velocity cannot be scaled: in dimension 0 the
    /// momenta are randomized once and the scaling restarts, in any later
    /// dimension (or after the retry) it is an error.
    pub fn scale_momenta(&mut self, temperature: f64) -> Result<()> {
        let count = self.system.n_leaf() as f64;
        let mut retried = false;
        let mut dim = 0;
        while dim < D {
            let m_scale = self.transform.m_scale();
            let sum: f64 = self
                .system
                .rings
                .iter()
                .flat_map(|ring| ring.beads.iter().zip(m_scale))
                .map(|(bead, s)| bead.mass * s * bead.velocity[dim] * bead.velocity[dim])
                .sum();
            if sum == 0.0 {
                if temperature == 0.0 {
                    dim += 1;
                    continue;
                }
                if dim > 0 || retried {
                    return Err(PimdError::ZeroVelocityDimension { dim });
                }
                warn!("no velocity in dimension 0, randomizing momenta before scaling");
                self.randomize_momenta();
                retried = true;
                continue;
            }
            let scale = (temperature * count / sum).sqrt();
            for ring in self.system.rings.iter_mut() {
                for bead in ring.beads.iter_mut() {
                    bead.velocity[dim] *= scale;
                }
            }
            dim += 1;
        }
        self.rebuild_drift();
        self.compute_kinetic_energy();
        info!(
            "momenta scaled to T = {}, kinetic temperature {:.6}",
            temperature,
            self.kinetic_temperature()
        );
        Ok(())
    }
}
