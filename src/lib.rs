//! Rust PIMD - path-integral molecular dynamics of ring polymers in Rust
//!
//! Each quantum particle is a ring of N beads joined by harmonic springs.
//! The rings are propagated with BAOAB Langevin dynamics, with the stiff
//! springs decoupled by a staging or normal-mode transform and integrated
//! either through the force kick or exactly in the collective coordinates.

pub mod coefficients;
pub mod error;
pub mod integrator;
pub mod io;
pub mod potential;
pub mod random;
pub mod space;
pub mod system;
pub mod transform;

// Re-export commonly used types at crate root
pub use coefficients::{NormalModeCoefficients, RingParameters, SpringModel, StagingCoefficients};
pub use error::{PimdError, Result};
pub use integrator::{BaoabIntegrator, FreeRingPropagator, IntegratorParams, IntegratorState, MomentumDrift};
pub use io::{read_config, PimdConfig};
pub use potential::{Anharmonic234, FreeField, PotentialCompute, RingSprings};
pub use random::RandomSource;
pub use space::{Boundary, Nonperiodic, PeriodicBox, Vector};
pub use system::{Bead, RingPolymer, RingSystem};
pub use transform::{RealSpace, RingScratch, RingTransform};
