//! Staging coefficients.
//!
//! Eliminating beads N-1, N-2, ..., 1 in turn from the reference Hamiltonian
//! turns it into independent oscillators
//!
//! ```text
//! u_0 = r_0
//! u_i = r_i - f11[i] r_{i-1} - f1n[i] r_0        (i >= 1)
//! ```
//!
//! with stiffness `m kappa sinh((N-i+1)a)/sinh((N-i)a)` for `u_i` and
//! `m kappa 2 sinh(a) tanh(N a/2)` for `u_0`.

use approx::relative_eq;
use log::debug;

use super::{cosh_ratio, sinh_ratio, RingParameters};

/// Immutable staging tables for one bead count and sampling frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct StagingCoefficients {
    pub n_beads: usize,
    pub alpha: f64,
    /// Spring frequency squared `kappa` the stiffness values are measured in
    pub spring_omega2: f64,
    /// Kinetic mass of mode `i` in units of the bead mass
    pub m_scale: Vec<f64>,
    /// Weight of the downstream collective force: `F_u[i] = F_i + f_scale[i] F_u[i+1]`
    pub f_scale: Vec<f64>,
    /// `dr_i / du_0`, the weight of bead `i` in the collective force of mode 0
    pub f_scale0: Vec<f64>,
    /// Weight of the previous bead in the staging transform
    pub f11: Vec<f64>,
    /// Weight of the anchor bead in the staging transform
    pub f1n: Vec<f64>,
    /// Mode stiffness of the reference Hamiltonian, in units of `bead_mass * kappa`
    pub stiffness: Vec<f64>,
    /// Collective image of a rigid unit translation of the ring
    pub response: Vec<f64>,
    /// Factor `s` applied to every mass scale
    pub mass_rescale: f64,
    mode_omega2: Vec<f64>,
}

impl StagingCoefficients {
    pub fn derive(params: &RingParameters) -> Self {
        let n = params.n_beads;
        let alpha = params.alpha();
        let spring_omega2 = params.spring_omega2();

        let mut m_scale = vec![1.0; n];
        let mut f_scale = vec![0.0; n];
        let mut f_scale0 = vec![1.0; n];
        let mut f11 = vec![0.0; n];
        let mut f1n = vec![0.0; n];
        let mut stiffness = vec![0.0; n];

        if n == 1 {
            // a lone bead only feels the tether
            stiffness[0] = params.sample_tether_omega2() / spring_omega2;
        } else if alpha == 0.0 {
            for i in 1..n {
                let k = (n - i) as f64;
                m_scale[i] = (k + 1.0) / k;
                f_scale[i] = (k - 1.0) / k;
                f11[i] = k / (k + 1.0);
                f1n[i] = 1.0 / (k + 1.0);
                stiffness[i] = m_scale[i];
            }
        } else {
            let nf = n as f64;
            for i in 1..n {
                let k = (n - i) as f64;
                m_scale[i] = sinh_ratio(k + 1.0, k, alpha);
                f_scale[i] = sinh_ratio(k - 1.0, k, alpha);
                f_scale0[i] = cosh_ratio(0.5 * nf - i as f64, 0.5 * nf, alpha);
                f11[i] = sinh_ratio(k, k + 1.0, alpha);
                f1n[i] = sinh_ratio(1.0, k + 1.0, alpha);
                stiffness[i] = m_scale[i];
            }
            stiffness[0] = 2.0 * alpha.sinh() * (0.5 * nf * alpha).tanh();
        }

        let response = rigid_translation_image(&f11, &f1n);

        let mut mass_rescale = 1.0;
        if stiffness[0] > 0.0 {
            // every mode starts at frequency sqrt(kappa); then the ring inertia is fixed to N m
            m_scale[0] = stiffness[0];
            let effective: f64 = m_scale.iter().zip(&response).map(|(m, a)| m * a * a).sum();
            mass_rescale = n as f64 / effective;
            for m in m_scale.iter_mut() {
                *m *= mass_rescale;
            }
        }

        let mode_omega2 = stiffness
            .iter()
            .zip(&m_scale)
            .map(|(k, m)| spring_omega2 * k / m)
            .collect();

        let coefficients = Self {
            n_beads: n,
            alpha,
            spring_omega2,
            m_scale,
            f_scale,
            f_scale0,
            f11,
            f1n,
            stiffness,
            response,
            mass_rescale,
            mode_omega2,
        };
        debug!(
            "staging tables: n_beads={} alpha={:.6} s={:.6} m_scale[0]={:.6}",
            n, alpha, mass_rescale, coefficients.m_scale[0]
        );
        debug_assert!(
            params.sample_tether_omega2() == 0.0
                || relative_eq!(coefficients.effective_mass_ratio(), n as f64, max_relative = 1e-9)
        );
        coefficients
    }

    /// Squared frequency of every staging mode under the reference Hamiltonian.
    pub fn mode_omega2(&self) -> &[f64] {
        &self.mode_omega2
    }

    /// `sum_i m_scale[i] a[i]^2`, the ring inertia in units of the bead mass.
    pub fn effective_mass_ratio(&self) -> f64 {
        self.m_scale
            .iter()
            .zip(&self.response)
            .map(|(m, a)| m * a * a)
            .sum()
    }
}

/// Staging coordinates of a ring displaced rigidly by one unit.
fn rigid_translation_image(f11: &[f64], f1n: &[f64]) -> Vec<f64> {
    let mut a = vec![1.0; f11.len()];
    for i in 1..a.len() {
        a[i] = 1.0 - f11[i] - f1n[i];
    }
    a
}
