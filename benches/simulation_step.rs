use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use nbody2d::config::SimConfig;
use nbody2d::math::Vec2;
use nbody2d::particles::{Quad, Simulation};

fn populated_simulation(side: f64, spacing: f64) -> Simulation {
    let view = Quad::new(0.0, 0.0, 1600.0, 900.0);
    let mut sim = Simulation::new(view, SimConfig::default())
        .expect("Failed to create simulation");
    let mut rng = StdRng::seed_from_u64(0);
    sim.spawn_grid(Vec2::new(800.0, 450.0), side, spacing, &mut rng)
        .expect("Failed to spawn grid");
    sim
}

pub fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");
    group.measurement_time(std::time::Duration::from_secs(5));
    group.sample_size(50);

    let dt = 0.25 / 60.0;

    // ~100, ~400, and ~1600 particles.
    for (label, side, spacing) in [
        ("100_particles", 100.0, 10.0),
        ("400_particles", 200.0, 10.0),
        ("1600_particles", 400.0, 10.0),
    ] {
        group.bench_function(label, |b| {
            let mut sim = populated_simulation(side, spacing);
            b.iter(|| {
                sim.step(dt).expect("Step failed");
            });
        });
    }

    group.finish();
}

pub fn bench_index_build(c: &mut Criterion) {
    use nbody2d::particles::{Point, QuadTree};

    let mut group = c.benchmark_group("quadtree_build");
    let sim = populated_simulation(400.0, 10.0);
    let bounds = *sim.bounds();
    let points: Vec<Point> = sim
        .particles
        .iter()
        .map(|p| Point::new(p.position.x, p.position.y))
        .collect();

    group.bench_function("1600_points", |b| {
        b.iter(|| {
            let tree = QuadTree::build(bounds, 2, points.iter().copied());
            tree.len()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_step, bench_index_build);
criterion_main!(benches);
