use super::Vector;

/// Periodic geometry of the simulation box.
pub trait Boundary<const D: usize> {
    /// Replace `dr` by its minimum image.
    fn nearest_image(&self, dr: &mut Vector<D>);
}

/// Open boundaries: every displacement is already its own nearest image.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nonperiodic;

impl<const D: usize> Boundary<D> for Nonperiodic {
    #[inline]
    fn nearest_image(&self, _dr: &mut Vector<D>) {}
}

/// Rectangular box, periodic along every axis.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicBox<const D: usize> {
    pub edges: Vector<D>,
}

impl<const D: usize> PeriodicBox<D> {
    pub fn new(edges: Vector<D>) -> Self {
        Self { edges }
    }

    pub fn cubic(edge: f64) -> Self {
        Self { edges: Vector::<D>::repeat(edge) }
    }

    pub fn volume(&self) -> f64 {
        self.edges.product()
    }
}

impl<const D: usize> Boundary<D> for PeriodicBox<D> {
    fn nearest_image(&self, dr: &mut Vector<D>) {
        let shift = dr.component_div(&self.edges).map(|x| x.round());
        *dr -= self.edges.component_mul(&shift);
    }
}
