// demos/basic_simulation.rs

use rand::rngs::StdRng;
use rand::SeedableRng;

use nbody2d::config::SimConfig;
use nbody2d::errors::SimulationError;
use nbody2d::math::Vec2;
use nbody2d::particles::{Quad, Simulation};

fn main() -> Result<(), SimulationError> {
    env_logger::init();

    let view = Quad::new(0.0, 0.0, 1600.0, 900.0);
    let mut sim = Simulation::new(view, SimConfig::default())?;

    // Spawn a spiraling grid of particles around the view center.
    let mut rng = StdRng::seed_from_u64(0);
    let spawned = sim.spawn_grid(Vec2::new(800.0, 450.0), 400.0, 10.0, &mut rng)?;
    println!("Spawned {} particles", spawned);

    // 60 fps at quarter speed, as in the reference dynamics.
    let dt = 0.25 / 60.0;

    for frame in 0..600 {
        let stats = sim.step(dt)?;
        if frame % 100 == 0 {
            let momentum = sim
                .particles
                .iter()
                .fold(Vec2::ZERO, |acc, p| acc + p.velocity * p.mass);
            println!(
                "frame {:4}: {} alive, {} culled this frame, net momentum ({:.3}, {:.3})",
                frame, stats.alive, stats.culled, momentum.x, momentum.y
            );
        }
    }

    if let Some(index) = sim.index() {
        let mut regions = Vec::new();
        index.boundaries(&mut regions);
        println!("Final spatial index: {} points in {} nodes", index.len(), regions.len());
    }

    Ok(())
}
