//! Source of the Gaussian deviates used by the thermostat.

use rand::Rng;
use rand_distr::StandardNormal;

pub trait RandomSource {
    /// One independent standard normal draw.
    fn next_gaussian(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn next_gaussian(&mut self) -> f64 {
        self.sample(StandardNormal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_seeded_streams_repeat() {
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        for _ in 0..16 {
            assert_eq!(a.next_gaussian(), b.next_gaussian());
        }
    }

    #[test]
    fn test_unit_variance() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 200_000;
        let (mut sum, mut sum2) = (0.0, 0.0);
        for _ in 0..n {
            let x = rng.next_gaussian();
            sum += x;
            sum2 += x * x;
        }
        let mean = sum / n as f64;
        assert!(mean.abs() < 0.01);
        assert!((sum2 / n as f64 - 1.0).abs() < 0.02);
    }
}
