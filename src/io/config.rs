//! Run configuration read from a YAML file.
//!
//! ```yaml
//! dimension: 1
//! n_rings: 1
//! n_beads: 16
//! mass: 1.0
//! temperature: 0.5
//! omega: 1.0
//! k4: 24.0
//! propagator: staging_exact
//! centroid_sampling: true
//! time_step: 0.05
//! gamma: 1.0
//! steps: 20000
//! ```
//!
//! Every field has a default, so a file only lists what it changes.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coefficients::{RingParameters, SpringModel};
use crate::error::{PimdError, Result};
use crate::integrator::{FreeRingPropagator, IntegratorParams};
use crate::space::Vector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PimdConfig {
    /// 1 or 3
    pub dimension: usize,
    pub n_rings: usize,
    pub n_beads: usize,
    /// Particle mass
    pub mass: f64,
    pub temperature: f64,
    pub hbar: f64,
    /// Harmonic frequency of the external well
    pub omega: f64,
    /// Cubic and quartic coefficients of the particle potential
    pub k3: f64,
    pub k4: f64,
    /// Build the transform with the physical frequency (EC variants)
    pub centroid_sampling: bool,
    pub spring_model: SpringModel,
    pub propagator: FreeRingPropagator,
    pub time_step: f64,
    pub gamma: f64,
    pub isothermal: bool,
    pub prevent_drift: bool,
    /// Distance between neighbouring lattice sites
    pub lattice_spacing: f64,
    /// Wrap the lattice in a periodic box
    pub periodic: bool,
    pub steps: usize,
    pub report_interval: usize,
    pub seed: u64,
}

impl Default for PimdConfig {
    fn default() -> Self {
        Self {
            dimension: 1,
            n_rings: 1,
            n_beads: 8,
            mass: 1.0,
            temperature: 1.0,
            hbar: 1.0,
            omega: 1.0,
            k3: 0.0,
            k4: 0.0,
            centroid_sampling: false,
            spring_model: SpringModel::Primitive,
            propagator: FreeRingPropagator::StagingLinear,
            time_step: 0.01,
            gamma: 1.0,
            isothermal: true,
            prevent_drift: false,
            lattice_spacing: 4.0,
            periodic: false,
            steps: 10000,
            report_interval: 1000,
            seed: 1,
        }
    }
}

impl PimdConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dimension != 1 && self.dimension != 3 {
            return Err(PimdError::config(format!(
                "dimension must be 1 or 3, got {}",
                self.dimension
            )));
        }
        if self.n_rings == 0 {
            return Err(PimdError::config("n_rings must be at least 1"));
        }
        if !(self.lattice_spacing > 0.0) {
            return Err(PimdError::config("lattice_spacing must be positive"));
        }
        if self.report_interval == 0 {
            return Err(PimdError::config("report_interval must be at least 1"));
        }
        self.ring_parameters().validate()?;
        self.integrator_params().validate()
    }

    pub fn ring_parameters(&self) -> RingParameters {
        let params = RingParameters::new(
            self.n_beads,
            self.mass,
            self.temperature,
            self.hbar,
            self.omega * self.omega,
        )
        .with_spring_model(self.spring_model);
        if self.centroid_sampling {
            params.centroid_sampled()
        } else {
            params
        }
    }

    pub fn integrator_params(&self) -> IntegratorParams {
        IntegratorParams {
            time_step: self.time_step,
            temperature: self.temperature,
            gamma: self.gamma,
            isothermal: self.isothermal,
            prevent_drift: self.prevent_drift,
        }
    }

    /// Sites per edge of the smallest simple-cubic block holding every ring.
    pub fn cells_per_edge(&self) -> usize {
        let mut m: usize = 1;
        while m.pow(self.dimension as u32) < self.n_rings {
            m += 1;
        }
        m
    }

    /// Edge of the periodic box around the lattice.
    pub fn box_edge(&self) -> f64 {
        self.cells_per_edge() as f64 * self.lattice_spacing
    }

    /// Simple-cubic lattice sites, filled in index order.
    pub fn lattice_sites<const D: usize>(&self) -> Vec<Vector<D>> {
        let m = self.cells_per_edge();
        (0..self.n_rings)
            .map(|k| {
                let mut rest = k;
                Vector::<D>::from_fn(|_, _| {
                    let digit = rest % m;
                    rest /= m;
                    digit as f64 * self.lattice_spacing
                })
            })
            .collect()
    }
}

/// Read a [`PimdConfig`] from a YAML file and check it.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<PimdConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: PimdConfig = serde_yaml::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}
