//! System module - ring polymers and the box that holds them.

mod ring;

pub use ring::{Bead, RingPolymer, RingSystem};
