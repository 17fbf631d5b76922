//! IO module - YAML run configuration.

mod config;

pub use config::{read_config, PimdConfig};
