use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use rust_pimd::integrator::ou_coefficients;
use rust_pimd::transform::forward;
use rust_pimd::{
    Anharmonic234, BaoabIntegrator, FreeField, FreeRingPropagator, IntegratorParams, Nonperiodic, PeriodicBox,
    PimdError, RingParameters, RingPolymer, RingScratch, RingSystem, SpringModel, Vector,
};

type Integrator1<P> = BaoabIntegrator<1, P, Nonperiodic, StdRng>;

fn quartic_oscillator(
    propagator: FreeRingPropagator,
    ring: RingParameters,
    params: IntegratorParams,
    k3: f64,
    k4: f64,
) -> Integrator1<Anharmonic234<1>> {
    let sites = vec![Vector::<1>::zeros()];
    let system = RingSystem::on_sites(&sites, ring.n_beads, ring.particle_mass(), Nonperiodic).unwrap();
    let potential = Anharmonic234::per_bead(&ring, k3, k4, sites);
    BaoabIntegrator::new(system, potential, StdRng::seed_from_u64(17), ring, propagator, params).unwrap()
}

fn max_energy_drift<P: rust_pimd::PotentialCompute<1>>(integrator: &mut Integrator1<P>, steps: usize) -> f64 {
    let e0 = integrator.total_energy();
    let mut worst: f64 = 0.0;
    for _ in 0..steps {
        integrator.step().unwrap();
        worst = worst.max((integrator.total_energy() - e0).abs());
    }
    worst / e0.abs()
}

#[test]
fn test_energy_conserved_without_thermostat() {
    for propagator in FreeRingPropagator::ALL {
        for centroid in [false, true] {
            let mut ring = RingParameters::new(8, 1.0, 1.0, 1.0, 1.0);
            if centroid {
                ring = ring.centroid_sampled();
            }
            let dt = if propagator.is_linear() { 0.002 } else { 0.01 };
            let params = IntegratorParams::new(dt, 1.0, 0.0).without_thermostat();
            let mut integrator = quartic_oscillator(propagator, ring, params, 0.0, 0.5);
            integrator.randomize_momenta();
            let drift = max_energy_drift(&mut integrator, 2000);
            assert!(
                drift < 1e-3,
                "{:?} (centroid = {}) drifted by {}",
                propagator,
                centroid,
                drift
            );
        }
    }
}

#[test]
fn test_energy_error_is_second_order_in_time_step() {
    for propagator in [FreeRingPropagator::RealSpace, FreeRingPropagator::StagingLinear] {
        let ring = RingParameters::new(8, 1.0, 1.0, 1.0, 1.0);
        let drift_at = |dt: f64, steps: usize| {
            let params = IntegratorParams::new(dt, 1.0, 0.0).without_thermostat();
            let mut integrator = quartic_oscillator(propagator, ring, params, 0.0, 0.5);
            integrator.randomize_momenta();
            max_energy_drift(&mut integrator, steps)
        };
        // same stretch of time, half the step
        let coarse = drift_at(0.004, 500);
        let fine = drift_at(0.002, 1000);
        let ratio = coarse / fine;
        assert!(ratio > 3.0 && ratio < 5.0, "{:?}: drift ratio {}", propagator, ratio);
    }
}

#[test]
fn test_exact_variants_absorb_the_harmonic_well() {
    let exact = [
        FreeRingPropagator::StagingExact,
        FreeRingPropagator::StagingCayley,
        FreeRingPropagator::NormalModeExact,
        FreeRingPropagator::NormalModeCayley,
    ];
    for propagator in exact {
        for model in [SpringModel::Primitive, SpringModel::Continuum] {
            let ring = RingParameters::new(6, 1.0, 0.5, 1.0, 4.0)
                .with_spring_model(model)
                .centroid_sampled();
            let params = IntegratorParams::new(0.05, 0.5, 0.0).without_thermostat();
            let mut integrator = quartic_oscillator(propagator, ring, params, 0.0, 0.0);
            integrator.randomize_momenta();
            for _ in 0..50 {
                integrator.step().unwrap();
            }
            // nothing is left for the kick
            for f in integrator.forces() {
                assert!(f.norm() < 1e-10, "{:?} {:?} kick {}", propagator, model, f.norm());
            }
            if propagator == FreeRingPropagator::StagingExact || propagator == FreeRingPropagator::NormalModeExact {
                assert!(max_energy_drift(&mut integrator, 500) < 1e-10);
            }
        }
    }
}

#[test]
fn test_single_bead_is_classical_baoab() {
    let (k2, k3, k4): (f64, f64, f64) = (1.0, 0.3, 0.5);
    let (dt, gamma, temperature): (f64, f64, f64) = (0.05, 0.7, 0.8);
    for propagator in [
        FreeRingPropagator::RealSpace,
        FreeRingPropagator::StagingLinear,
        FreeRingPropagator::NormalModeLinear,
    ] {
        let ring = RingParameters::new(1, 1.0, temperature, 1.0, k2);
        let params = IntegratorParams::new(dt, temperature, gamma);
        let sites = vec![Vector::<1>::zeros()];
        let system = RingSystem::on_sites(&sites, 1, 1.0, Nonperiodic).unwrap();
        let potential = Anharmonic234::new(k2, k3, k4, sites);
        let mut integrator =
            BaoabIntegrator::new(system, potential, StdRng::seed_from_u64(5), ring, propagator, params).unwrap();
        integrator.system_mut().rings[0].beads[0].position.x = 0.3;
        integrator.system_mut().rings[0].beads[0].velocity.x = 0.7;
        integrator.post_restore().unwrap();

        let force = |x: f64| -x * (k2 + x * (0.5 * k3 + x * k4 / 6.0));
        let (damping, noise) = ou_coefficients(gamma, dt);
        let mut rng = StdRng::seed_from_u64(5);
        let (mut x, mut v): (f64, f64) = (0.3, 0.7);
        for _ in 0..200 {
            v += 0.5 * dt * force(x);
            x += 0.5 * dt * v;
            let xi: f64 = rng.sample(StandardNormal);
            v = damping * v + noise * temperature.sqrt() * xi;
            x += 0.5 * dt * v;
            v += 0.5 * dt * force(x);
            integrator.step().unwrap();
        }
        let bead = &integrator.system().rings[0].beads[0];
        assert_relative_eq!(bead.position.x, x, epsilon = 1e-9);
        assert_relative_eq!(bead.velocity.x, v, epsilon = 1e-9);
        assert_eq!(integrator.step_count(), 200);
    }
}

#[test]
fn test_free_ring_at_rest_stays_on_lattice() {
    for propagator in FreeRingPropagator::ALL {
        let ring = RingParameters::new(4, 1.0, 1.0, 1.0, 0.0);
        let params = IntegratorParams::new(0.01, 1.0, 0.0).without_thermostat();
        let site = Vector::<3>::new(1.0, -2.0, 0.5);
        let system = RingSystem::on_sites(&[site], 4, 1.0, Nonperiodic).unwrap();
        let mut integrator =
            BaoabIntegrator::new(system, FreeField::new(), StdRng::seed_from_u64(1), ring, propagator, params)
                .unwrap();
        for _ in 0..100 {
            integrator.step().unwrap();
        }
        for bead in &integrator.system().rings[0].beads {
            assert_eq!(bead.position, site);
            assert_eq!(bead.velocity, Vector::<3>::zeros());
        }
        assert_eq!(integrator.total_energy(), 0.0);
    }
}

#[test]
fn test_one_step_from_rest_is_driven_by_the_thermostat() {
    let dt = 0.01;
    let h = 0.5 * dt;
    for propagator in [FreeRingPropagator::StagingExact, FreeRingPropagator::NormalModeExact] {
        let ring = RingParameters::new(4, 1.0, 1.0, 1.0, 0.0);
        let params = IntegratorParams::new(dt, 1.0, 1.0);
        let site = Vector::<3>::new(1.0, -2.0, 0.5);
        let system = RingSystem::on_sites(&[site], 4, 1.0, Nonperiodic).unwrap();
        let mut integrator =
            BaoabIntegrator::new(system, FreeField::new(), StdRng::seed_from_u64(3), ring, propagator, params)
                .unwrap();
        integrator.step().unwrap();
        assert!(integrator.kinetic_energy() > 0.0);
        assert!(integrator.system().rings[0].beads.iter().any(|b| b.position != site));

        // the ring left the lattice only during the second half drift
        let mut scratch = RingScratch::new(4);
        forward(
            integrator.transform(),
            &integrator.system().rings[0],
            &site,
            &Nonperiodic,
            &mut scratch,
        );
        let omega2 = integrator.transform().mode_omega2();
        for (i, (u, bead)) in scratch.coords.iter().zip(&integrator.system().rings[0].beads).enumerate() {
            let expected = if omega2[i] == 0.0 {
                h * bead.velocity
            } else {
                let w = omega2[i].sqrt();
                ((w * h).tan() / w) * bead.velocity
            };
            assert_relative_eq!((u - expected).norm(), 0.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_large_periodic_box_matches_open_space() {
    let ring = RingParameters::new(8, 1.0, 1.0, 1.0, 1.0).centroid_sampled();
    let params = IntegratorParams::new(0.05, 1.0, 1.0);
    let sites = vec![Vector::<3>::new(0.5, 0.5, 0.5), Vector::<3>::new(4.5, 0.5, 0.5)];

    let open = RingSystem::on_sites(&sites, 8, 1.0, Nonperiodic).unwrap();
    let potential = Anharmonic234::per_bead(&ring, 0.0, 0.2, sites.clone());
    let mut a = BaoabIntegrator::new(
        open,
        potential,
        StdRng::seed_from_u64(9),
        ring,
        FreeRingPropagator::StagingExact,
        params,
    )
    .unwrap();

    let boxed = RingSystem::on_sites(&sites, 8, 1.0, PeriodicBox::<3>::cubic(1000.0)).unwrap();
    let potential = Anharmonic234::per_bead(&ring, 0.0, 0.2, sites.clone());
    let mut b = BaoabIntegrator::new(
        boxed,
        potential,
        StdRng::seed_from_u64(9),
        ring,
        FreeRingPropagator::StagingExact,
        params,
    )
    .unwrap();

    a.randomize_momenta();
    b.randomize_momenta();
    for _ in 0..200 {
        a.step().unwrap();
        b.step().unwrap();
    }
    for (p, q) in a.system().beads().zip(b.system().beads()) {
        assert_relative_eq!((p.position - q.position).norm(), 0.0, epsilon = 1e-10);
    }
    assert_relative_eq!(a.total_energy(), b.total_energy(), epsilon = 1e-10);
}

#[test]
fn test_ring_straddling_the_box_edge_stays_together() {
    let ring = RingParameters::new(8, 1.0, 1.0, 1.0, 25.0).centroid_sampled();
    let params = IntegratorParams::new(0.05, 1.0, 1.0);
    let site = Vector::<3>::new(1.99, 0.0, 0.0);
    let system = RingSystem::on_sites(&[site], 8, 1.0, PeriodicBox::<3>::cubic(4.0)).unwrap();
    let potential = Anharmonic234::per_bead(&ring, 0.0, 0.0, vec![site]);
    let mut integrator = BaoabIntegrator::new(
        system,
        potential,
        StdRng::seed_from_u64(4),
        ring,
        FreeRingPropagator::NormalModeCayley,
        params,
    )
    .unwrap();
    integrator.randomize_momenta();
    for _ in 0..500 {
        integrator.step().unwrap();
    }
    // beads keep their own image, so the raw distance to the site stays short
    for bead in &integrator.system().rings[0].beads {
        assert!((bead.position - site).norm() < 1.5);
    }
    assert!(integrator.potential_energy().is_finite());
}

#[test]
fn test_drift_prevention_requires_staging_linear() {
    let ring = RingParameters::new(4, 1.0, 1.0, 1.0, 1.0);
    let params = IntegratorParams::new(0.01, 1.0, 1.0).with_drift_prevention();
    let sites = vec![Vector::<1>::zeros(), Vector::<1>::new(3.0)];
    for propagator in FreeRingPropagator::ALL {
        let system = RingSystem::on_sites(&sites, 4, 1.0, Nonperiodic).unwrap();
        let result = BaoabIntegrator::new(
            system,
            FreeField::new(),
            StdRng::seed_from_u64(1),
            ring,
            propagator,
            params,
        );
        if propagator == FreeRingPropagator::StagingLinear {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(PimdError::Config(_))));
        }
    }
}

#[test]
fn test_drift_prevention_needs_two_rings() {
    let ring = RingParameters::new(4, 1.0, 1.0, 1.0, 1.0);
    let params = IntegratorParams::new(0.01, 1.0, 1.0).with_drift_prevention();
    let system = RingSystem::on_sites(&[Vector::<1>::zeros()], 4, 1.0, Nonperiodic).unwrap();
    let result = BaoabIntegrator::new(
        system,
        FreeField::new(),
        StdRng::seed_from_u64(1),
        ring,
        FreeRingPropagator::StagingLinear,
        params,
    );
    assert!(matches!(result, Err(PimdError::Config(_))));
}

#[test]
fn test_construction_checks_every_ring() {
    // built directly, bypassing the checks in RingSystem::new
    let system = RingSystem {
        rings: vec![
            RingPolymer::collapsed(4, 1.0, Vector::<1>::zeros()),
            RingPolymer::collapsed(3, 0.75, Vector::<1>::new(3.0)),
        ],
        boundary: Nonperiodic,
    };
    let result = BaoabIntegrator::new(
        system,
        FreeField::new(),
        StdRng::seed_from_u64(1),
        RingParameters::new(4, 1.0, 1.0, 1.0, 1.0),
        FreeRingPropagator::StagingLinear,
        IntegratorParams::new(0.01, 1.0, 1.0),
    );
    assert!(matches!(
        result,
        Err(PimdError::BeadCountMismatch { ring: 1, expected: 4, found: 3 })
    ));
}

#[test]
fn test_construction_checks_sizes() {
    let ring = RingParameters::new(8, 1.0, 1.0, 1.0, 1.0);
    let params = IntegratorParams::new(0.01, 1.0, 1.0);
    let sites = vec![Vector::<1>::zeros(), Vector::<1>::new(3.0)];

    let system = RingSystem::on_sites(&sites, 4, 0.5, Nonperiodic).unwrap();
    let result = BaoabIntegrator::new(
        system,
        FreeField::new(),
        StdRng::seed_from_u64(1),
        ring,
        FreeRingPropagator::StagingLinear,
        params,
    );
    assert!(matches!(
        result,
        Err(PimdError::BeadCountMismatch { expected: 8, found: 4, .. })
    ));

    // one site for two rings leaves the potential short of forces
    let system = RingSystem::on_sites(&sites, 8, 1.0, Nonperiodic).unwrap();
    let potential = Anharmonic234::harmonic(1.0, vec![Vector::<1>::zeros()]);
    let result = BaoabIntegrator::new(
        system,
        potential,
        StdRng::seed_from_u64(1),
        ring,
        FreeRingPropagator::StagingLinear,
        params,
    );
    assert!(matches!(
        result,
        Err(PimdError::ForceCountMismatch { expected: 16, found: 8 })
    ));

    let system = RingSystem::on_sites(&sites, 8, 1.0, Nonperiodic).unwrap();
    let result = BaoabIntegrator::new(
        system,
        FreeField::new(),
        StdRng::seed_from_u64(1),
        ring,
        FreeRingPropagator::StagingLinear,
        IntegratorParams::new(0.01, 2.0, 1.0),
    );
    assert!(matches!(result, Err(PimdError::Config(_))));
}
