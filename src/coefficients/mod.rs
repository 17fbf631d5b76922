//! Coefficients module - closed-form tables that decouple the ring springs.
//!
//! Both derivations start from the same reference Hamiltonian per ring,
//!
//! ```text
//! H_ref = 1/2 m kappa sum_j [ (r_j - r_{j-1})^2 + (tau/kappa) r_j^2 ]
//! ```
//!
//! where `m` is the bead mass, `kappa` the spring frequency squared and `tau`
//! the frequency squared of the sampling tether. `D = 2 + tau/kappa` and
//! `D = 2 cosh(alpha)` fix every hyperbolic coefficient.

mod normal_mode;
mod staging;

pub use normal_mode::NormalModeCoefficients;
pub use staging::StagingCoefficients;

use serde::{Deserialize, Serialize};

use crate::error::{PimdError, Result};

/// How the imaginary-time propagator is discretised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpringModel {
    /// Primitive (Trotter) springs, `kappa = omega_N^2`.
    #[default]
    Primitive,
    /// Springs and tether of the exact harmonic propagator, so that
    /// `alpha = omega / omega_N` and the harmonic part carries no Trotter error.
    Continuum,
}

/// Physical and sampling parameters of one ring polymer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingParameters {
    pub n_beads: usize,
    /// Mass of one bead (particle mass / N)
    pub bead_mass: f64,
    pub temperature: f64,
    pub hbar: f64,
    /// Physical harmonic frequency squared of the particle
    pub omega2: f64,
    /// Frequency squared used to build the transform (0 for plain variants)
    pub omega2_sample: f64,
    pub spring_model: SpringModel,
}

impl RingParameters {
    /// Plain parameters: primitive springs and a free-ring transform.
    pub fn new(n_beads: usize, particle_mass: f64, temperature: f64, hbar: f64, omega2: f64) -> Self {
        Self {
            n_beads,
            bead_mass: particle_mass / n_beads.max(1) as f64,
            temperature,
            hbar,
            omega2,
            omega2_sample: 0.0,
            spring_model: SpringModel::Primitive,
        }
    }

    /// Build the transform with the physical frequency (centroid / EC variants).
    pub fn centroid_sampled(mut self) -> Self {
        self.omega2_sample = self.omega2;
        self
    }

    pub fn with_sampling(mut self, omega2_sample: f64) -> Self {
        self.omega2_sample = omega2_sample;
        self
    }

    pub fn with_spring_model(mut self, spring_model: SpringModel) -> Self {
        self.spring_model = spring_model;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_beads == 0 {
            return Err(PimdError::config("n_beads must be at least 1"));
        }
        let positive = [
            ("bead mass", self.bead_mass),
            ("temperature", self.temperature),
            ("hbar", self.hbar),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(PimdError::config(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(self.omega2 >= 0.0 && self.omega2_sample >= 0.0) {
            return Err(PimdError::config("harmonic frequencies must be non-negative"));
        }
        Ok(())
    }

    pub fn particle_mass(&self) -> f64 {
        self.bead_mass * self.n_beads as f64
    }

    /// omega_N = N / (hbar beta)
    pub fn omega_n(&self) -> f64 {
        self.n_beads as f64 * self.temperature / self.hbar
    }

    /// Spring frequency squared `kappa`; the spring constant is `bead_mass * kappa`.
    pub fn spring_omega2(&self) -> f64 {
        let omega_n = self.omega_n();
        let omega_n2 = omega_n * omega_n;
        match self.spring_model {
            SpringModel::Primitive => omega_n2,
            SpringModel::Continuum => {
                let r = self.omega2.sqrt() / omega_n;
                if r == 0.0 {
                    omega_n2
                } else {
                    omega_n2 * r / r.sinh()
                }
            }
        }
    }

    /// Spring constant between neighbouring beads (0 for a single bead).
    pub fn spring_constant(&self) -> f64 {
        if self.n_beads == 1 {
            0.0
        } else {
            self.bead_mass * self.spring_omega2()
        }
    }

    /// Per-bead tether frequency squared that represents a harmonic well `omega2`.
    pub fn tether_omega2(&self, omega2: f64) -> f64 {
        match self.spring_model {
            SpringModel::Primitive => omega2,
            SpringModel::Continuum => {
                let r = omega2.sqrt() / self.omega_n();
                if r == 0.0 {
                    0.0
                } else {
                    omega2 * 2.0 * (0.5 * r).tanh() / r
                }
            }
        }
    }

    /// Tether frequency squared `tau` of the sampling reference.
    pub fn sample_tether_omega2(&self) -> f64 {
        self.tether_omega2(self.omega2_sample)
    }

    /// `alpha = acosh(D/2)`, exactly 0 for a free ring.
    pub fn alpha(&self) -> f64 {
        let tau = self.sample_tether_omega2();
        if tau == 0.0 {
            return 0.0;
        }
        // D/2 = 1 + h; ln(D/2 + sqrt(D^2/4 - 1)) without cancellation for small h
        let h = 0.5 * tau / self.spring_omega2();
        (h + (h * (2.0 + h)).sqrt()).ln_1p()
    }
}

/// `sinh(a x) / sinh(b x)` for `x > 0`, stable when the arguments are large.
pub(crate) fn sinh_ratio(a: f64, b: f64, x: f64) -> f64 {
    let num = -(-2.0 * a * x).exp_m1();
    let den = -(-2.0 * b * x).exp_m1();
    ((a - b) * x).exp() * num / den
}

/// `cosh(a x) / cosh(b x)` for `x > 0`.
pub(crate) fn cosh_ratio(a: f64, b: f64, x: f64) -> f64 {
    let (a, b) = (a.abs(), b.abs());
    let num = 1.0 + (-2.0 * a * x).exp();
    let den = 1.0 + (-2.0 * b * x).exp();
    ((a - b) * x).exp() * num / den
}
