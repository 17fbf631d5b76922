use super::RingTransform;
use crate::space::Vector;

/// Bead displacements used directly as the collective coordinates.
///
/// Every mode carries the bead mass and no reference stiffness, so the free
/// ring drifts linearly and the springs act through the kick.
#[derive(Debug, Clone, PartialEq)]
pub struct RealSpace {
    n_beads: usize,
    m_scale: Vec<f64>,
    mode_omega2: Vec<f64>,
}

impl RealSpace {
    pub fn new(n_beads: usize) -> Self {
        Self {
            n_beads,
            m_scale: vec![1.0; n_beads],
            mode_omega2: vec![0.0; n_beads],
        }
    }
}

impl<const D: usize> RingTransform<D> for RealSpace {
    fn n_beads(&self) -> usize {
        self.n_beads
    }

    fn m_scale(&self) -> &[f64] {
        &self.m_scale
    }

    fn mode_omega2(&self) -> &[f64] {
        &self.mode_omega2
    }

    /// A rigid translation moves every bead by one unit.
    fn response(&self) -> &[f64] {
        &self.m_scale
    }

    fn to_collective(&self, disp: &[Vector<D>], coords: &mut [Vector<D>]) {
        coords.copy_from_slice(disp);
    }

    fn from_collective(&self, coords: &[Vector<D>], disp: &mut [Vector<D>]) {
        disp.copy_from_slice(coords);
    }

    fn project_forces(&self, forces: &[Vector<D>], collective: &mut [Vector<D>]) {
        collective.copy_from_slice(forces);
    }
}
