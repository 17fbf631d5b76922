//! Transform module - maps between real bead positions and the collective
//! coordinates that decouple the springs.
//!
//! Displacements are taken from the ring's lattice site through the minimum
//! image, so the collective coordinates never see the periodic box. The
//! inverse map moves each bead by the minimum image of its change, which keeps
//! the bead in the periodic image it started in.

mod normal_mode;
mod real_space;
mod staging;

pub use real_space::RealSpace;

use crate::space::{Boundary, Vector};
use crate::system::RingPolymer;

/// Linear collective-coordinate transform of one ring.
pub trait RingTransform<const D: usize> {
    fn n_beads(&self) -> usize;

    /// Kinetic mass of each mode in units of the bead mass.
    fn m_scale(&self) -> &[f64];

    /// Squared frequency of each mode under the reference Hamiltonian.
    fn mode_omega2(&self) -> &[f64];

    /// Collective image of a rigid unit translation.
    fn response(&self) -> &[f64];

    /// Bead displacements to collective coordinates.
    fn to_collective(&self, disp: &[Vector<D>], coords: &mut [Vector<D>]);

    /// Collective coordinates to bead displacements.
    fn from_collective(&self, coords: &[Vector<D>], disp: &mut [Vector<D>]);

    /// Real-space bead forces to generalized forces on the collective coordinates.
    fn project_forces(&self, forces: &[Vector<D>], collective: &mut [Vector<D>]);

    /// Ring inertia along a rigid translation, in units of the bead mass.
    fn effective_mass_ratio(&self) -> f64 {
        self.m_scale()
            .iter()
            .zip(self.response())
            .map(|(m, a)| m * a * a)
            .sum()
    }
}

/// Per-ring work buffers, allocated once and reused by every propagator call.
#[derive(Debug, Clone)]
pub struct RingScratch<const D: usize> {
    pub disp: Vec<Vector<D>>,
    pub coords: Vec<Vector<D>>,
    pub forces: Vec<Vector<D>>,
}

impl<const D: usize> RingScratch<D> {
    pub fn new(n_beads: usize) -> Self {
        Self {
            disp: vec![Vector::<D>::zeros(); n_beads],
            coords: vec![Vector::<D>::zeros(); n_beads],
            forces: vec![Vector::<D>::zeros(); n_beads],
        }
    }
}

/// Fill `scratch.disp` with the wrapped bead displacements from `site`
/// and `scratch.coords` with the collective coordinates.
pub fn forward<const D: usize, T, B>(
    transform: &T,
    ring: &RingPolymer<D>,
    site: &Vector<D>,
    boundary: &B,
    scratch: &mut RingScratch<D>,
) where
    T: RingTransform<D> + ?Sized,
    B: Boundary<D>,
{
    for (dr, bead) in scratch.disp.iter_mut().zip(&ring.beads) {
        *dr = bead.position - site;
        boundary.nearest_image(dr);
    }
    transform.to_collective(&scratch.disp, &mut scratch.coords);
}

/// Move the beads to the positions described by `scratch.coords`.
pub fn inverse<const D: usize, T, B>(
    transform: &T,
    ring: &mut RingPolymer<D>,
    site: &Vector<D>,
    boundary: &B,
    scratch: &mut RingScratch<D>,
) where
    T: RingTransform<D> + ?Sized,
    B: Boundary<D>,
{
    transform.from_collective(&scratch.coords, &mut scratch.disp);
    for (bead, dr) in ring.beads.iter_mut().zip(&scratch.disp) {
        let mut shift = site + dr - bead.position;
        boundary.nearest_image(&mut shift);
        bead.position += shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::{NormalModeCoefficients, RingParameters, StagingCoefficients};
    use crate::transform::RealSpace;
    use crate::space::PeriodicBox;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn transforms(n: usize, omega2: f64) -> Vec<Box<dyn RingTransform<3>>> {
        let plain = RingParameters::new(n, 1.0, 0.7, 1.0, omega2);
        let ec = plain.centroid_sampled();
        vec![
            Box::new(StagingCoefficients::derive(&plain)),
            Box::new(StagingCoefficients::derive(&ec)),
            Box::new(NormalModeCoefficients::derive(&plain)),
            Box::new(NormalModeCoefficients::derive(&ec)),
            Box::new(RealSpace::new(n)),
        ]
    }

    #[test]
    fn test_round_trip_keeps_periodic_images() {
        let boundary = PeriodicBox::<3>::cubic(5.0);
        let site = Vector3::new(2.4, -2.4, 0.0);
        let mut rng = StdRng::seed_from_u64(7);
        for transform in transforms(6, 1.5) {
            let mut ring = RingPolymer::collapsed(6, 1.0, site);
            for bead in ring.beads.iter_mut() {
                bead.position += Vector3::new(rng.gen_range(-0.4..0.4), rng.gen_range(-0.4..0.4), rng.gen_range(-0.4..0.4));
            }
            // one bead sits in the neighbouring image
            ring.beads[3].position.x += 5.0;
            let before: Vec<_> = ring.beads.iter().map(|b| b.position).collect();

            let mut scratch = RingScratch::new(6);
            forward(transform.as_ref(), &ring, &site, &boundary, &mut scratch);
            inverse(transform.as_ref(), &mut ring, &site, &boundary, &mut scratch);

            for (bead, old) in ring.beads.iter().zip(&before) {
                assert_relative_eq!((bead.position - old).norm(), 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_collapsed_ring_has_zero_coordinates() {
        let site = Vector3::new(1.0, 2.0, 3.0);
        for transform in transforms(4, 0.0) {
            let ring = RingPolymer::collapsed(4, 1.0, site);
            let mut scratch = RingScratch::new(4);
            forward(transform.as_ref(), &ring, &site, &crate::space::Nonperiodic, &mut scratch);
            assert!(scratch.coords.iter().all(|u| u.norm() == 0.0));
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip_identity(
            n in 1usize..12,
            omega2 in 0.0f64..20.0,
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            for transform in transforms(n, omega2) {
                let disp: Vec<Vector3<f64>> = (0..n)
                    .map(|_| Vector3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
                    .collect();
                let mut coords = vec![Vector3::zeros(); n];
                let mut back = vec![Vector3::zeros(); n];
                transform.to_collective(&disp, &mut coords);
                transform.from_collective(&coords, &mut back);
                for (a, b) in disp.iter().zip(&back) {
                    prop_assert!((a - b).norm() < 1e-10);
                }
            }
        }
    }
}
