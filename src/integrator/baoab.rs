//! The BAOAB driver shared by every free-ring variant.

use log::{debug, info};

use super::drift::MomentumDrift;
use super::propagator::{ou_coefficients, FreeRingPropagator};
use super::IntegratorParams;
use crate::coefficients::RingParameters;
use crate::error::{PimdError, Result};
use crate::potential::{PotentialCompute, RingSprings};
use crate::random::RandomSource;
use crate::space::{Boundary, Vector};
use crate::system::RingSystem;
use crate::transform::{forward, inverse, RingScratch, RingTransform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorState {
    /// Forces are fresh, no step taken since construction or reset
    Initialized,
    Stepping,
}

/// Langevin PIMD integrator.
///
/// Positions are real space. The velocity of bead `i` is the velocity of
/// collective mode `i` of its ring, with mass `m * m_scale[i]`.
pub struct BaoabIntegrator<const D: usize, P, B, R> {
    pub(super) system: RingSystem<D, B>,
    pub(super) potential: P,
    pub(super) random: R,
    pub(super) params: IntegratorParams,
    pub(super) ring: RingParameters,
    pub(super) propagator: FreeRingPropagator,
    pub(super) transform: Box<dyn RingTransform<D>>,
    pub(super) springs: RingSprings,
    /// Bead-0 positions at construction, one per ring
    pub(super) lattice: Vec<Vector<D>>,
    /// Kick force per bead in real space
    pub(super) forces: Vec<Vector<D>>,
    pub(super) scratch: RingScratch<D>,
    pub(super) drift: Option<MomentumDrift<D>>,
    pub(super) state: IntegratorState,
    pub(super) potential_energy: f64,
    pub(super) kinetic_energy: f64,
    pub(super) step_count: u64,
}

impl<const D: usize, P, B, R> BaoabIntegrator<D, P, B, R>
where
    P: PotentialCompute<D>,
    B: Boundary<D>,
    R: RandomSource,
{
    /// Build the coefficient tables for `ring` and compute the initial forces.
    ///
    /// The current bead-0 positions become the lattice sites the collective
    /// coordinates are measured from.
    pub fn new(
        system: RingSystem<D, B>,
        potential: P,
        random: R,
        ring: RingParameters,
        propagator: FreeRingPropagator,
        params: IntegratorParams,
    ) -> Result<Self> {
        ring.validate()?;
        params.validate()?;
        let n = ring.n_beads;
        if system.rings.is_empty() {
            return Err(PimdError::config("a ring system needs at least one ring"));
        }
        for (index, polymer) in system.rings.iter().enumerate() {
            if polymer.n_beads() != n {
                return Err(PimdError::BeadCountMismatch {
                    ring: index,
                    expected: n,
                    found: polymer.n_beads(),
                });
            }
        }
        if let Some(bead) = system
            .beads()
            .find(|b| (b.mass - ring.bead_mass).abs() > 1e-12 * ring.bead_mass)
        {
            return Err(PimdError::config(format!(
                "bead mass {} differs from the ring parameters ({})",
                bead.mass, ring.bead_mass
            )));
        }
        if (params.temperature - ring.temperature).abs() > 1e-12 * ring.temperature {
            return Err(PimdError::config(format!(
                "thermostat temperature {} differs from the ring temperature {}",
                params.temperature, ring.temperature
            )));
        }
        let drift = if params.prevent_drift {
            if !propagator.supports_drift_prevention() {
                return Err(PimdError::config(format!(
                    "drift prevention is only implemented for StagingLinear, not {:?}",
                    propagator
                )));
            }
            if system.n_rings() < 2 {
                return Err(PimdError::config("drift prevention needs at least two rings"));
            }
            Some(MomentumDrift::new(n))
        } else {
            None
        };

        let transform = propagator.build_transform::<D>(&ring);
        info!(
            "{:?} integrator: {} rings x {} beads, omega_N = {:.6}, dt = {}, gamma = {}",
            propagator,
            system.n_rings(),
            n,
            ring.omega_n(),
            params.time_step,
            params.gamma
        );
        let lattice = system.anchor_positions();
        let n_leaf = system.n_leaf();
        let mut integrator = Self {
            system,
            potential,
            random,
            params,
            ring,
            propagator,
            transform,
            springs: RingSprings::new(&ring),
            lattice,
            forces: vec![Vector::<D>::zeros(); n_leaf],
            scratch: RingScratch::new(n),
            drift,
            state: IntegratorState::Initialized,
            potential_energy: 0.0,
            kinetic_energy: 0.0,
            step_count: 0,
        };
        integrator.reset()?;
        Ok(integrator)
    }

    /// One BAOAB step of length `time_step`.
    pub fn step(&mut self) -> Result<()> {
        let dt = self.params.time_step;
        self.state = IntegratorState::Stepping;
        self.propagator_b(0.5 * dt);
        self.propagator_a(0.5 * dt);
        self.propagator_o(dt);
        self.propagator_a(0.5 * dt);
        self.compute_forces()?;
        self.propagator_b(0.5 * dt);
        self.compute_kinetic_energy();
        self.step_count += 1;
        Ok(())
    }

    /// Free-ring motion in collective coordinates.
    pub fn propagator_a(&mut self, dt: f64) {
        let transform = self.transform.as_ref();
        let omega2 = transform.mode_omega2();
        let boundary = &self.system.boundary;
        for (ring, site) in self.system.rings.iter_mut().zip(&self.lattice) {
            forward(transform, ring, site, boundary, &mut self.scratch);
            for (i, (u, bead)) in self.scratch.coords.iter_mut().zip(ring.beads.iter_mut()).enumerate() {
                self.propagator.advance(u, &mut bead.velocity, omega2[i], dt);
                if let Some(drift) = &self.drift {
                    *u -= dt * drift.mean_velocity(i);
                }
            }
            inverse(transform, ring, site, boundary, &mut self.scratch);
        }
    }

    /// Kick every mode with the projected force.
    pub fn propagator_b(&mut self, dt: f64) {
        let n = self.ring.n_beads;
        let transform = self.transform.as_ref();
        let m_scale = transform.m_scale();
        for (ring, forces) in self.system.rings.iter_mut().zip(self.forces.chunks(n)) {
            transform.project_forces(forces, &mut self.scratch.forces);
            for (i, (bead, f)) in ring.beads.iter_mut().zip(&self.scratch.forces).enumerate() {
                let m_eff = bead.mass * m_scale[i];
                let dv = (dt / m_eff) * f;
                bead.velocity += dv;
                if let Some(drift) = self.drift.as_mut() {
                    drift.add(i, m_eff * dv);
                }
            }
        }
    }

    /// Ornstein-Uhlenbeck thermostat on every mode velocity.
    pub fn propagator_o(&mut self, dt: f64) {
        if !self.params.isothermal || self.params.gamma == 0.0 {
            return;
        }
        let (damping, noise) = ou_coefficients(self.params.gamma, dt);
        let temperature = self.params.temperature;
        let m_scale = self.transform.m_scale();
        for ring in self.system.rings.iter_mut() {
            for (i, bead) in ring.beads.iter_mut().enumerate() {
                let m_eff = bead.mass * m_scale[i];
                let sigma = noise * (temperature / m_eff).sqrt();
                let xi = Vector::<D>::from_fn(|_, _| self.random.next_gaussian());
                let old = bead.velocity;
                bead.velocity = damping * old + sigma * xi;
                if let Some(drift) = self.drift.as_mut() {
                    drift.add(i, m_eff * (bead.velocity - old));
                }
            }
        }
    }

    /// Forces for the kick and the potential energy (external plus springs).
    fn compute_forces(&mut self) -> Result<()> {
        let external = self.potential.compute_all(&self.system, true);
        let computed = self.potential.forces();
        if computed.len() != self.forces.len() {
            return Err(PimdError::ForceCountMismatch {
                expected: self.forces.len(),
                found: computed.len(),
            });
        }
        self.forces.copy_from_slice(computed);

        let n = self.ring.n_beads;
        let boundary = &self.system.boundary;
        let mut spring_energy = 0.0;
        for ((ring, site), forces) in self
            .system
            .rings
            .iter()
            .zip(&self.lattice)
            .zip(self.forces.chunks_mut(n))
        {
            if self.propagator.is_linear() {
                spring_energy += self.springs.add_forces(ring, boundary, forces);
            } else {
                spring_energy += self.springs.energy(ring, boundary);
                self.springs.remove_tether(ring, site, boundary, forces);
            }
        }
        self.potential_energy = external + spring_energy;
        Ok(())
    }

    /// `sum 1/2 m m_scale[i] |v_i|^2` over every bead.
    pub fn compute_kinetic_energy(&mut self) -> f64 {
        let m_scale = self.transform.m_scale();
        let mut sum = 0.0;
        for ring in &self.system.rings {
            for (bead, s) in ring.beads.iter().zip(m_scale) {
                sum += bead.mass * s * bead.velocity.norm_squared();
            }
        }
        self.kinetic_energy = 0.5 * sum;
        self.kinetic_energy
    }

    /// Back to the initial state: forces, energies and drift accumulators
    /// are recomputed from the current configuration.
    pub fn reset(&mut self) -> Result<()> {
        self.state = IntegratorState::Initialized;
        self.step_count = 0;
        self.post_restore()
    }

    /// Refresh everything derived from the positions and velocities after
    /// they were replaced from outside, keeping the step count.
    pub fn post_restore(&mut self) -> Result<()> {
        self.compute_forces()?;
        self.rebuild_drift();
        self.compute_kinetic_energy();
        debug!(
            "forces refreshed at step {}: PE = {:.8}, KE = {:.8}",
            self.step_count, self.potential_energy, self.kinetic_energy
        );
        Ok(())
    }

    pub(super) fn rebuild_drift(&mut self) {
        if let Some(drift) = self.drift.as_mut() {
            drift.rebuild(&self.system, self.transform.m_scale());
        }
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.kinetic_energy
    }

    pub fn potential_energy(&self) -> f64 {
        self.potential_energy
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }

    /// Instantaneous temperature from equipartition over every mode.
    pub fn kinetic_temperature(&self) -> f64 {
        2.0 * self.kinetic_energy / (D * self.system.n_leaf()) as f64
    }

    pub fn system(&self) -> &RingSystem<D, B> {
        &self.system
    }

    /// Mutable access to the rings. Call [`Self::post_restore`] after
    /// changing positions or velocities.
    pub fn system_mut(&mut self) -> &mut RingSystem<D, B> {
        &mut self.system
    }

    pub fn potential(&self) -> &P {
        &self.potential
    }

    pub fn transform(&self) -> &dyn RingTransform<D> {
        self.transform.as_ref()
    }

    pub fn ring_parameters(&self) -> &RingParameters {
        &self.ring
    }

    pub fn params(&self) -> &IntegratorParams {
        &self.params
    }

    pub fn propagator(&self) -> FreeRingPropagator {
        self.propagator
    }

    pub fn lattice(&self) -> &[Vector<D>] {
        &self.lattice
    }

    /// Real-space kick forces of the last force evaluation.
    pub fn forces(&self) -> &[Vector<D>] {
        &self.forces
    }

    pub fn drift(&self) -> Option<&MomentumDrift<D>> {
        self.drift.as_ref()
    }

    pub fn state(&self) -> IntegratorState {
        self.state
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}
