use clap::Parser;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use rust_pimd::{
    read_config, Anharmonic234, BaoabIntegrator, Boundary, Nonperiodic, PeriodicBox, PimdConfig, Result,
    RingSystem, Vector,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    /// Override the number of steps in the config file
    #[arg(short, long)]
    steps: Option<usize>,

    /// Override the random seed in the config file
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = read_config(&args.config)?;
    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!("read configuration from {}", args.config);
    match (config.dimension, config.periodic) {
        (1, false) => simulate::<1, _>(&config, Nonperiodic),
        (1, true) => simulate::<1, _>(&config, periodic_box::<1>(&config)),
        (3, false) => simulate::<3, _>(&config, Nonperiodic),
        _ => simulate::<3, _>(&config, periodic_box::<3>(&config)),
    }
}

fn periodic_box<const D: usize>(config: &PimdConfig) -> PeriodicBox<D> {
    let boundary = PeriodicBox::<D>::cubic(config.box_edge());
    info!(
        "periodic box of edge {}, density {:.6}",
        config.box_edge(),
        config.n_rings as f64 / boundary.volume()
    );
    boundary
}

/// Mean radius of gyration and mean centroid displacement from the lattice.
fn ring_shape<const D: usize, B: Boundary<D>>(system: &RingSystem<D, B>, lattice: &[Vector<D>]) -> (f64, f64) {
    let mut gyration = 0.0;
    let mut shift = 0.0;
    for (ring, site) in system.rings.iter().zip(lattice) {
        gyration += ring.gyration_radius(&system.boundary);
        let mut dr = ring.centroid(&system.boundary) - site;
        system.boundary.nearest_image(&mut dr);
        shift += dr.norm();
    }
    let n = system.n_rings() as f64;
    (gyration / n, shift / n)
}

fn simulate<const D: usize, B: Boundary<D>>(config: &PimdConfig, boundary: B) -> Result<()> {
    let ring = config.ring_parameters();
    let sites = config.lattice_sites::<D>();
    let system = RingSystem::on_sites(&sites, config.n_beads, config.mass, boundary)?;
    let potential = Anharmonic234::per_bead(&ring, config.k3, config.k4, sites);
    let rng = StdRng::seed_from_u64(config.seed);
    let mut integrator = BaoabIntegrator::new(
        system,
        potential,
        rng,
        ring,
        config.propagator,
        config.integrator_params(),
    )?;
    integrator.randomize_momenta();

    println!("PIMD {:?}, {} rings x {} beads, T = {}", config.propagator, config.n_rings, config.n_beads, config.temperature);
    println!(
        "{:>10} {:>14} {:>14} {:>14} {:>10} {:>10} {:>10}",
        "step", "KE", "PE", "E", "T_kin", "R_g", "|dc|"
    );
    let mut sum_t = 0.0;
    let mut sum_pe = 0.0;
    let mut sum_rg = 0.0;
    for step in 1..=config.steps {
        integrator.step()?;
        let (gyration, shift) = ring_shape(integrator.system(), integrator.lattice());
        sum_t += integrator.kinetic_temperature();
        sum_pe += integrator.potential_energy();
        sum_rg += gyration;
        if step % config.report_interval == 0 {
            println!(
                "{:>10} {:>14.6} {:>14.6} {:>14.6} {:>10.4} {:>10.4} {:>10.4}",
                step,
                integrator.kinetic_energy(),
                integrator.potential_energy(),
                integrator.total_energy(),
                integrator.kinetic_temperature(),
                gyration,
                shift
            );
        }
    }
    if config.steps > 0 {
        let n = config.steps as f64;
        println!("mean kinetic temperature: {:.6}", sum_t / n);
        println!("mean potential energy:    {:.6}", sum_pe / n);
        println!("mean gyration radius:     {:.6}", sum_rg / n);
    }
    Ok(())
}
