//! Ring polymers: N replicas of one quantum particle joined by springs in
//! imaginary time. Bead `i` is bonded to beads `i-1` and `i+1` (mod N).

use crate::error::{PimdError, Result};
use crate::space::{Boundary, Vector};

/// One imaginary-time replica.
///
/// `position` is a real-space coordinate. `velocity` belongs to collective
/// mode `i` of the ring (staging or normal-mode coordinate) once an
/// integrator owns the system.
#[derive(Clone, Debug, PartialEq)]
pub struct Bead<const D: usize> {
    pub position: Vector<D>,
    pub velocity: Vector<D>,
    /// Bead mass, i.e. the physical particle mass divided by N
    pub mass: f64,
}

impl<const D: usize> Bead<D> {
    pub fn at_rest(position: Vector<D>, mass: f64) -> Self {
        Self {
            position,
            velocity: Vector::<D>::zeros(),
            mass,
        }
    }
}

/// A closed path of beads sharing one particle.
#[derive(Clone, Debug)]
pub struct RingPolymer<const D: usize> {
    pub beads: Vec<Bead<D>>,
}

impl<const D: usize> RingPolymer<D> {
    /// Collapse all `n_beads` beads of a particle of mass `particle_mass` onto `site`.
    pub fn collapsed(n_beads: usize, particle_mass: f64, site: Vector<D>) -> Self {
        let mass = particle_mass / n_beads as f64;
        let beads = (0..n_beads).map(|_| Bead::at_rest(site, mass)).collect();
        Self { beads }
    }

    #[inline]
    pub fn n_beads(&self) -> usize {
        self.beads.len()
    }

    pub fn particle_mass(&self) -> f64 {
        self.beads.iter().map(|b| b.mass).sum()
    }

    /// Centroid of the ring, with every bead unwrapped next to bead 0.
    pub fn centroid<B: Boundary<D>>(&self, boundary: &B) -> Vector<D> {
        let origin = self.beads[0].position;
        let mut sum = Vector::<D>::zeros();
        for bead in &self.beads {
            let mut dr = bead.position - origin;
            boundary.nearest_image(&mut dr);
            sum += dr;
        }
        origin + sum / self.n_beads() as f64
    }

    /// Radius of gyration about the centroid.
    pub fn gyration_radius<B: Boundary<D>>(&self, boundary: &B) -> f64 {
        let center = self.centroid(boundary);
        let sum: f64 = self
            .beads
            .iter()
            .map(|bead| {
                let mut dr = bead.position - center;
                boundary.nearest_image(&mut dr);
                dr.norm_squared()
            })
            .sum();
        (sum / self.n_beads() as f64).sqrt()
    }
}

/// All ring polymers of a simulation plus the boundary they live in.
///
/// Every ring has the same number of beads; bead `i` of ring `r` has the
/// global (leaf) index `r * n_beads + i`.
#[derive(Clone, Debug)]
pub struct RingSystem<const D: usize, B> {
    pub rings: Vec<RingPolymer<D>>,
    pub boundary: B,
}

impl<const D: usize, B: Boundary<D>> RingSystem<D, B> {
    pub fn new(rings: Vec<RingPolymer<D>>, boundary: B) -> Result<Self> {
        let Some(first) = rings.first() else {
            return Err(PimdError::config("a ring system needs at least one ring"));
        };
        let expected = first.n_beads();
        if expected == 0 {
            return Err(PimdError::config("rings need at least one bead"));
        }
        for (ring, polymer) in rings.iter().enumerate() {
            if polymer.n_beads() != expected {
                return Err(PimdError::BeadCountMismatch {
                    ring,
                    expected,
                    found: polymer.n_beads(),
                });
            }
            if polymer.beads.iter().any(|b| !(b.mass > 0.0 && b.mass.is_finite())) {
                return Err(PimdError::config(format!(
                    "ring {} has a bead with non-positive mass",
                    ring
                )));
            }
        }
        Ok(Self { rings, boundary })
    }

    /// One collapsed ring per lattice site.
    pub fn on_sites(sites: &[Vector<D>], n_beads: usize, particle_mass: f64, boundary: B) -> Result<Self> {
        let rings = sites
            .iter()
            .map(|&site| RingPolymer::collapsed(n_beads, particle_mass, site))
            .collect();
        Self::new(rings, boundary)
    }

    #[inline]
    pub fn n_rings(&self) -> usize {
        self.rings.len()
    }

    #[inline]
    pub fn n_beads(&self) -> usize {
        self.rings[0].n_beads()
    }

    /// Total number of beads in the system.
    #[inline]
    pub fn n_leaf(&self) -> usize {
        self.n_rings() * self.n_beads()
    }

    pub fn beads(&self) -> impl Iterator<Item = &Bead<D>> {
        self.rings.iter().flat_map(|ring| ring.beads.iter())
    }

    /// Position of bead 0 of every ring.
    pub fn anchor_positions(&self) -> Vec<Vector<D>> {
        self.rings.iter().map(|ring| ring.beads[0].position).collect()
    }
}
