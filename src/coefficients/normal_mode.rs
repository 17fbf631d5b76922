//! Normal-mode coefficients: the cyclic spring matrix is diagonalised by a
//! real Fourier basis, with eigenvalues `tau/kappa + 4 sin^2(pi k / N)`.

use std::f64::consts::PI;

use approx::relative_eq;
use log::debug;
use nalgebra::DMatrix;

use super::RingParameters;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalModeCoefficients {
    pub n_beads: usize,
    pub spring_omega2: f64,
    /// Orthonormal eigenvectors, `eigenvectors[(bead, mode)]`
    pub eigenvectors: DMatrix<f64>,
    /// Eigenvalues of the reference Hamiltonian in units of `bead_mass * kappa`
    pub eigenvalues: Vec<f64>,
    pub m_scale: Vec<f64>,
    pub response: Vec<f64>,
    pub mass_rescale: f64,
    mode_omega2: Vec<f64>,
}

impl NormalModeCoefficients {
    pub fn derive(params: &RingParameters) -> Self {
        let n = params.n_beads;
        let nf = n as f64;
        let spring_omega2 = params.spring_omega2();
        let tether = params.sample_tether_omega2() / spring_omega2;

        let eigenvectors = fourier_basis(n);
        let eigenvalues: Vec<f64> = (0..n)
            .map(|k| {
                let s = (PI * mode_wavenumber(k, n) as f64 / nf).sin();
                tether + 4.0 * s * s
            })
            .collect();

        let mut m_scale = eigenvalues.clone();
        if eigenvalues[0] == 0.0 {
            m_scale[0] = 1.0;
        }

        // q of a rigid unit translation: sqrt(N) on the centroid mode, 0 elsewhere
        let response: Vec<f64> = (0..n).map(|k| eigenvectors.column(k).sum()).collect();

        let mut mass_rescale = 1.0;
        if eigenvalues[0] > 0.0 {
            let effective: f64 = m_scale.iter().zip(&response).map(|(m, a)| m * a * a).sum();
            mass_rescale = nf / effective;
            for m in m_scale.iter_mut() {
                *m *= mass_rescale;
            }
        }

        let mode_omega2 = eigenvalues
            .iter()
            .zip(&m_scale)
            .map(|(l, m)| spring_omega2 * l / m)
            .collect();

        let coefficients = Self {
            n_beads: n,
            spring_omega2,
            eigenvectors,
            eigenvalues,
            m_scale,
            response,
            mass_rescale,
            mode_omega2,
        };
        debug!("normal-mode tables: n_beads={} s={:.6}", n, mass_rescale);
        debug_assert!(
            tether == 0.0 || relative_eq!(coefficients.effective_mass_ratio(), nf, max_relative = 1e-9)
        );
        coefficients
    }

    pub fn mode_omega2(&self) -> &[f64] {
        &self.mode_omega2
    }

    pub fn effective_mass_ratio(&self) -> f64 {
        self.m_scale
            .iter()
            .zip(&self.response)
            .map(|(m, a)| m * a * a)
            .sum()
    }
}

/// Wavenumber carried by column `k` of the Fourier basis.
fn mode_wavenumber(k: usize, n: usize) -> usize {
    if 2 * k > n {
        n - k
    } else {
        k
    }
}

/// Real orthonormal Fourier basis: constant mode, cosine/sine pairs
/// (columns `k` and `N-k`) and, for even N, the alternating mode.
fn fourier_basis(n: usize) -> DMatrix<f64> {
    let nf = n as f64;
    let norm = (1.0 / nf).sqrt();
    let pair_norm = (2.0 / nf).sqrt();
    DMatrix::from_fn(n, n, |j, k| {
        let phase = 2.0 * PI * (j * mode_wavenumber(k, n)) as f64 / nf;
        if k == 0 || 2 * k == n {
            norm * phase.cos()
        } else if 2 * k < n {
            pair_norm * phase.cos()
        } else {
            pair_norm * phase.sin()
        }
    })
}
