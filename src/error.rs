//! Error type shared by the integrator, its collaborators and the config layer.

use thiserror::Error;

/// Errors reported by ring-polymer construction and integration.
#[derive(Error, Debug)]
pub enum PimdError {
    /// Invalid or unsupported integrator configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A ring does not have the bead count the coefficient tables were built for.
    #[error("ring {ring} has {found} beads but the coefficient tables expect {expected}")]
    BeadCountMismatch {
        ring: usize,
        expected: usize,
        found: usize,
    },

    /// The potential returned a force array of the wrong length.
    #[error("potential returned {found} forces for {expected} beads")]
    ForceCountMismatch { expected: usize, found: usize },

    /// Velocities vanish in a dimension that should be rescaled to a nonzero temperature.
    #[error("beads have no velocity component in dimension {dim}")]
    ZeroVelocityDimension { dim: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PimdError {
    pub fn config(message: impl Into<String>) -> Self {
        PimdError::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PimdError>;
