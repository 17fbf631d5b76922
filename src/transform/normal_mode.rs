use super::RingTransform;
use crate::coefficients::NormalModeCoefficients;
use crate::space::Vector;

impl<const D: usize> RingTransform<D> for NormalModeCoefficients {
    fn n_beads(&self) -> usize {
        self.n_beads
    }

    fn m_scale(&self) -> &[f64] {
        &self.m_scale
    }

    fn mode_omega2(&self) -> &[f64] {
        NormalModeCoefficients::mode_omega2(self)
    }

    fn response(&self) -> &[f64] {
        &self.response
    }

    fn to_collective(&self, disp: &[Vector<D>], coords: &mut [Vector<D>]) {
        for (k, q) in coords.iter_mut().enumerate() {
            let column = self.eigenvectors.column(k);
            *q = disp
                .iter()
                .zip(column.iter())
                .fold(Vector::<D>::zeros(), |acc, (dr, c)| acc + *c * dr);
        }
    }

    fn from_collective(&self, coords: &[Vector<D>], disp: &mut [Vector<D>]) {
        for (j, dr) in disp.iter_mut().enumerate() {
            let row = self.eigenvectors.row(j);
            *dr = coords
                .iter()
                .zip(row.iter())
                .fold(Vector::<D>::zeros(), |acc, (q, c)| acc + *c * q);
        }
    }

    /// The basis is orthonormal, so forces transform like displacements.
    fn project_forces(&self, forces: &[Vector<D>], collective: &mut [Vector<D>]) {
        RingTransform::<D>::to_collective(self, forces, collective);
    }
}
