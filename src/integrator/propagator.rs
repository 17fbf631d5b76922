//! Free-ring sub-steps and the thermostat coefficients.

use serde::{Deserialize, Serialize};

use crate::coefficients::{NormalModeCoefficients, RingParameters, StagingCoefficients};
use crate::space::Vector;
use crate::transform::{RealSpace, RingTransform};

/// Collective coordinates a variant works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingCoordinates {
    /// Bead displacements themselves
    RealSpace,
    Staging,
    NormalMode,
}

/// How the A step moves the free ring.
///
/// `RealSpace` drifts the beads themselves with the springs in the kick. The
/// other linear variants drift the collective coordinates and leave the springs to
/// the B kick. Exact and Cayley variants rotate each mode in its own
/// harmonic well, so the springs and the sampling tether never enter the kick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreeRingPropagator {
    RealSpace,
    #[default]
    StagingLinear,
    StagingExact,
    StagingCayley,
    NormalModeLinear,
    NormalModeExact,
    NormalModeCayley,
}

impl FreeRingPropagator {
    pub const ALL: [FreeRingPropagator; 7] = [
        FreeRingPropagator::RealSpace,
        FreeRingPropagator::StagingLinear,
        FreeRingPropagator::StagingExact,
        FreeRingPropagator::StagingCayley,
        FreeRingPropagator::NormalModeLinear,
        FreeRingPropagator::NormalModeExact,
        FreeRingPropagator::NormalModeCayley,
    ];

    pub fn coordinates(self) -> RingCoordinates {
        match self {
            FreeRingPropagator::RealSpace => RingCoordinates::RealSpace,
            FreeRingPropagator::StagingLinear
            | FreeRingPropagator::StagingExact
            | FreeRingPropagator::StagingCayley => RingCoordinates::Staging,
            FreeRingPropagator::NormalModeLinear
            | FreeRingPropagator::NormalModeExact
            | FreeRingPropagator::NormalModeCayley => RingCoordinates::NormalMode,
        }
    }

    /// Springs are integrated by the kick rather than by A.
    pub fn is_linear(self) -> bool {
        matches!(
            self,
            FreeRingPropagator::RealSpace | FreeRingPropagator::StagingLinear | FreeRingPropagator::NormalModeLinear
        )
    }

    pub fn supports_drift_prevention(self) -> bool {
        self == FreeRingPropagator::StagingLinear
    }

    pub fn build_transform<const D: usize>(self, params: &RingParameters) -> Box<dyn RingTransform<D>> {
        match self.coordinates() {
            RingCoordinates::RealSpace => Box::new(RealSpace::new(params.n_beads)),
            RingCoordinates::Staging => Box::new(StagingCoefficients::derive(params)),
            RingCoordinates::NormalMode => Box::new(NormalModeCoefficients::derive(params)),
        }
    }

    /// Advance one mode `(u, v)` with squared frequency `omega2` by `dt`.
    #[inline]
    pub fn advance<const D: usize>(self, u: &mut Vector<D>, v: &mut Vector<D>, omega2: f64, dt: f64) {
        if self.is_linear() || omega2 == 0.0 {
            *u += dt * *v;
            return;
        }
        match self {
            FreeRingPropagator::StagingExact | FreeRingPropagator::NormalModeExact => {
                let omega = omega2.sqrt();
                let (s, c) = (omega * dt).sin_cos();
                let u0 = *u;
                *u = c * u0 + (s / omega) * *v;
                *v = c * *v - (omega * s) * u0;
            }
            _ => {
                let a2 = 0.25 * omega2 * dt * dt;
                let inv = 1.0 / (1.0 + a2);
                let u0 = *u;
                *u = inv * ((1.0 - a2) * u0 + dt * *v);
                *v = inv * ((1.0 - a2) * *v - omega2 * dt * u0);
            }
        }
    }
}

/// Damping `exp(-gamma dt)` and noise amplitude `sqrt(1 - exp(-2 gamma dt))`.
pub fn ou_coefficients(gamma: f64, dt: f64) -> (f64, f64) {
    let x = gamma * dt;
    let noise = if x > 1e-4 {
        (1.0 - (-2.0 * x).exp()).sqrt()
    } else {
        (2.0 * x * (1.0 - x + x * x * 2.0 / 3.0 - x * x * x / 3.0)).sqrt()
    };
    ((-x).exp(), noise)
}
