//! Integrator module - BAOAB Langevin dynamics of ring polymers.
//!
//! One step is `B(dt/2) A(dt/2) O(dt) A(dt/2) B(dt/2)` with forces
//! recomputed before the final kick. A moves the free ring (springs and,
//! for the exact variants, the sampling tether) in collective coordinates,
//! B applies the remaining force and O is the Ornstein-Uhlenbeck thermostat.

mod baoab;
mod drift;
mod momenta;
mod propagator;

pub use baoab::{BaoabIntegrator, IntegratorState};
pub use drift::MomentumDrift;
pub use propagator::{ou_coefficients, FreeRingPropagator, RingCoordinates};

use serde::{Deserialize, Serialize};

use crate::error::{PimdError, Result};

/// Langevin parameters shared by every variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegratorParams {
    pub time_step: f64,
    /// Thermostat temperature (k_B = 1)
    pub temperature: f64,
    /// Friction coefficient of the O step
    pub gamma: f64,
    pub isothermal: bool,
    /// Remove the net momentum of each staging mode (StagingLinear only)
    pub prevent_drift: bool,
}

impl IntegratorParams {
    pub fn new(time_step: f64, temperature: f64, gamma: f64) -> Self {
        Self {
            time_step,
            temperature,
            gamma,
            isothermal: true,
            prevent_drift: false,
        }
    }

    /// Microcanonical dynamics: the O step does nothing.
    pub fn without_thermostat(mut self) -> Self {
        self.isothermal = false;
        self
    }

    pub fn with_drift_prevention(mut self) -> Self {
        self.prevent_drift = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(PimdError::config(format!("time step must be positive, got {}", self.time_step)));
        }
        if !(self.temperature > 0.0 && self.temperature.is_finite()) {
            return Err(PimdError::config(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        if !(self.gamma >= 0.0 && self.gamma.is_finite()) {
            return Err(PimdError::config(format!("gamma must be non-negative, got {}", self.gamma)));
        }
        Ok(())
    }
}
