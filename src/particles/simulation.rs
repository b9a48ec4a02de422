//! The per-step orchestrator for the n-body simulation.
//!
//! Each step runs four ordered phases with a hard barrier between them:
//! cull & reset, force accumulation, integration, and an optional rebuild of
//! the spatial index. The two middle phases are data-parallel over
//! contiguous index ranges of the particle collection using Rayon; the
//! collection itself is only resized in the single-threaded cull phase and
//! by the spawn operations, never while workers are active.
//!
//! Force accumulation is a parallel reduction: every worker scans its range
//! of outer indices against the whole population and writes the symmetric
//! contributions into a private buffer of per-particle increments. The
//! buffers are summed after the join barrier and applied in one pass, so no
//! two workers ever write the same particle's acceleration concurrently.
//!
//! # Example
//!
//! ```
//! use nbody2d::config::SimConfig;
//! use nbody2d::math::Vec2;
//! use nbody2d::particles::{Quad, Simulation};
//!
//! let view = Quad::new(0.0, 0.0, 1600.0, 900.0);
//! let mut sim = Simulation::new(view, SimConfig::default())
//!     .expect("Failed to create simulation");
//!
//! sim.spawn_at(Vec2::new(700.0, 450.0), 1.0).expect("spawn failed");
//! sim.spawn_at(Vec2::new(900.0, 450.0), 1.0).expect("spawn failed");
//!
//! let stats = sim.step(0.01).expect("step failed");
//! assert_eq!(stats.alive, 2);
//! ```

use log::{debug, trace, warn};
use rand::Rng;
use rayon::prelude::*;

use crate::config::SimConfig;
use crate::errors::SimulationError;
use crate::math::Vec2;

use super::particle::Particle;
use super::quadtree::{Point, Quad, QuadTree};

/// Per-step bookkeeping returned by [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStats {
    /// Particles removed by the cull phase.
    pub culled: usize,
    /// Particles alive after the step.
    pub alive: usize,
}

/// A population of mutually attracting particles plus the bounded region
/// they live in.
///
/// The region is the camera view enlarged by the configured overscan
/// factor, so particles that briefly leave the visible frame survive until
/// they drift genuinely far away. The caller recomputes the view each tick
/// from camera state via [`Simulation::set_view`].
pub struct Simulation {
    pub particles: Vec<Particle>,
    pub config: SimConfig,
    bounds: Quad,
    index: Option<QuadTree>,
    workers: usize,
}

impl Simulation {
    /// Creates an empty simulation over `view` enlarged by the configured
    /// overscan factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(view: Quad, config: SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let workers = config.workers.unwrap_or_else(detect_workers).max(1);
        Ok(Simulation {
            particles: Vec::new(),
            bounds: view.overscanned(config.overscan),
            config,
            index: None,
            workers,
        })
    }

    /// The overscanned region particles are culled against and indexed over.
    pub fn bounds(&self) -> &Quad {
        &self.bounds
    }

    /// The spatial index built by the most recent step, if any.
    pub fn index(&self) -> Option<&QuadTree> {
        self.index.as_ref()
    }

    /// Recomputes the simulation bounds from a new camera view.
    pub fn set_view(&mut self, view: Quad) {
        self.bounds = view.overscanned(self.config.overscan);
    }

    /// Inserts a particle at rest at `position` (world coordinates).
    pub fn spawn_at(&mut self, position: Vec2, radius: f64) -> Result<(), SimulationError> {
        let particle = Particle::new(position, radius, self.config.mass_per_radius)?;
        self.particles.push(particle);
        Ok(())
    }

    /// Inserts an anti-mass particle at rest at `position`.
    pub fn spawn_anti_at(&mut self, position: Vec2, radius: f64) -> Result<(), SimulationError> {
        let particle = Particle::new_anti(position, radius, self.config.mass_per_radius)?;
        self.particles.push(particle);
        Ok(())
    }

    /// Bulk-spawns a square grid of particles centered on `center`, `side`
    /// world units across with `spacing` between neighbors.
    ///
    /// Each particle gets a uniform random velocity in `[-40, 40]` per axis
    /// plus a tangential component (half the perpendicular of its offset to
    /// the grid center), which together set the population spiraling.
    ///
    /// Returns the number of particles spawned.
    pub fn spawn_grid(
        &mut self,
        center: Vec2,
        side: f64,
        spacing: f64,
        rng: &mut impl Rng,
    ) -> Result<usize, SimulationError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(SimulationError::InvalidConfig("spacing must be positive".to_string()));
        }
        let half = side / 2.0;
        let mut spawned = 0;

        let mut x = center.x - half;
        while x < center.x + half {
            let mut y = center.y - half;
            while y < center.y + half {
                let mut particle = Particle::new(Vec2::new(x, y), 1.0, self.config.mass_per_radius)?;
                particle.velocity = Vec2::new(
                    rng.random_range(-40.0..40.0),
                    rng.random_range(-40.0..40.0),
                );
                let offset = center - particle.position;
                particle.velocity += offset.perpendicular() * 0.5;
                self.particles.push(particle);
                spawned += 1;
                y += spacing;
            }
            x += spacing;
        }

        debug!("spawned {} particles in a {}x{} grid", spawned, side, side);
        Ok(spawned)
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.index = None;
    }

    /// Advances the simulation by one step of length `dt`.
    ///
    /// Phases run strictly in order: out-of-bounds particles are removed and
    /// survivors' accelerations zeroed, pairwise forces are accumulated in
    /// parallel, every survivor is integrated in parallel, and the spatial
    /// index is rebuilt from the new positions when enabled.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidTimeStep`] for a zero, negative, or
    /// non-finite `dt`; no phase runs in that case.
    pub fn step(&mut self, dt: f64) -> Result<StepStats, SimulationError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimulationError::InvalidTimeStep);
        }

        // Phase 1: cull & reset. A single retain pass visits every element
        // exactly once, so removals cannot skip the element that would have
        // shifted into a vacated slot.
        let before = self.particles.len();
        let bounds = self.bounds;
        self.particles.retain_mut(|particle| {
            let inside = bounds.contains(Point::new(particle.position.x, particle.position.y));
            if inside {
                particle.acceleration = Vec2::ZERO;
            }
            inside
        });
        let culled = before - self.particles.len();
        trace!("cull phase removed {} of {} particles", culled, before);

        // Phase 2: force accumulation behind a full join barrier.
        let increments = self.parallel_accelerations(dt);
        self.particles
            .par_iter_mut()
            .zip(increments.par_iter())
            .for_each(|(particle, increment)| {
                particle.acceleration += *increment;
            });

        // Phase 3: integration. Each worker touches only its own range.
        let color_smoothness = self.config.color_smoothness;
        self.particles
            .par_iter_mut()
            .for_each(|particle| particle.integrate(dt, color_smoothness));

        // Phase 4: spatial index rebuild from the new positions.
        if self.config.build_index {
            self.index = Some(QuadTree::build(
                self.bounds,
                self.config.leaf_capacity,
                self.particles
                    .iter()
                    .map(|particle| Point::new(particle.position.x, particle.position.y)),
            ));
        } else {
            self.index = None;
        }

        let stats = StepStats { culled, alive: self.particles.len() };
        debug!("step complete: {} culled, {} alive", stats.culled, stats.alive);
        Ok(stats)
    }

    /// Computes the per-particle acceleration increments for this step as a
    /// parallel reduction over unordered pairs.
    ///
    /// The outer index range is split into one contiguous chunk per worker.
    /// A worker scanning outer index `i` applies the symmetric contribution
    /// to every `j > i` in the whole population, but only into its own
    /// private buffer; the buffers are summed after the join barrier.
    /// Addition of the pairwise increments is commutative, so the result
    /// matches the sequential path regardless of worker count.
    pub(crate) fn parallel_accelerations(&self, dt: f64) -> Vec<Vec2> {
        let n = self.particles.len();
        if n < 2 {
            return vec![Vec2::ZERO; n];
        }

        let workers = self.workers;
        let chunk = n.div_ceil(workers);
        let particles = &self.particles;
        let g = self.config.gravitational_constant;
        let exclusion_ratio = self.config.exclusion_ratio;

        (0..workers)
            .into_par_iter()
            .map(|worker| {
                let start = (worker * chunk).min(n);
                let end = ((worker + 1) * chunk).min(n);
                let mut partial = vec![Vec2::ZERO; n];
                for i in start..end {
                    for j in (i + 1)..n {
                        if let Some((delta_i, delta_j)) =
                            particles[i].acceleration_delta(&particles[j], g, exclusion_ratio, dt)
                        {
                            partial[i] += delta_i;
                            partial[j] += delta_j;
                        }
                    }
                }
                partial
            })
            .reduce(
                || vec![Vec2::ZERO; n],
                |mut acc, partial| {
                    for (total, increment) in acc.iter_mut().zip(partial) {
                        *total += increment;
                    }
                    acc
                },
            )
    }

    /// Single-threaded reference computation of the same per-particle
    /// acceleration increments. Used to cross-check the parallel reduction.
    pub fn sequential_accelerations(&self, dt: f64) -> Vec<Vec2> {
        let n = self.particles.len();
        let g = self.config.gravitational_constant;
        let exclusion_ratio = self.config.exclusion_ratio;
        let mut increments = vec![Vec2::ZERO; n];
        for i in 0..n {
            for j in (i + 1)..n {
                if let Some((delta_i, delta_j)) =
                    self.particles[i].acceleration_delta(&self.particles[j], g, exclusion_ratio, dt)
                {
                    increments[i] += delta_i;
                    increments[j] += delta_j;
                }
            }
        }
        increments
    }
}

/// Resolves the worker count from the detected hardware concurrency,
/// degrading to a single synchronous worker when detection fails.
fn detect_workers() -> usize {
    match std::thread::available_parallelism() {
        Ok(count) => count.get(),
        Err(err) => {
            warn!("could not detect hardware concurrency ({}), using a single worker", err);
            1
        }
    }
}
