use super::RingTransform;
use crate::coefficients::StagingCoefficients;
use crate::space::Vector;

impl<const D: usize> RingTransform<D> for StagingCoefficients {
    fn n_beads(&self) -> usize {
        self.n_beads
    }

    fn m_scale(&self) -> &[f64] {
        &self.m_scale
    }

    fn mode_omega2(&self) -> &[f64] {
        StagingCoefficients::mode_omega2(self)
    }

    fn response(&self) -> &[f64] {
        &self.response
    }

    fn to_collective(&self, disp: &[Vector<D>], coords: &mut [Vector<D>]) {
        let dr0 = disp[0];
        coords[0] = dr0;
        for i in 1..self.n_beads {
            coords[i] = disp[i] - self.f11[i] * disp[i - 1] - self.f1n[i] * dr0;
        }
    }

    fn from_collective(&self, coords: &[Vector<D>], disp: &mut [Vector<D>]) {
        let u0 = coords[0];
        disp[0] = u0;
        for i in 1..self.n_beads {
            disp[i] = self.f11[i] * disp[i - 1] + self.f1n[i] * u0 + coords[i];
        }
    }

    /// Walks the ring backwards: each staging force carries the force of the
    /// beads downstream of it, and mode 0 collects every bead through `f_scale0`.
    fn project_forces(&self, forces: &[Vector<D>], collective: &mut [Vector<D>]) {
        let n = self.n_beads;
        let mut downstream = Vector::<D>::zeros();
        for i in (1..n).rev() {
            downstream = forces[i] + self.f_scale[i] * downstream;
            collective[i] = downstream;
        }
        collective[0] = forces
            .iter()
            .zip(&self.f_scale0)
            .fold(Vector::<D>::zeros(), |acc, (f, w)| acc + *w * f);
    }
}
