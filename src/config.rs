// src/config.rs

use crate::errors::SimulationError;

/// Tunable constants for the n-body simulation.
///
/// The defaults reproduce the reference dynamics: a gravitational constant
/// scaled well above the physical value so that motion is visible at
/// interactive frame rates, and a near-field exclusion zone that skips the
/// force contribution of particle pairs closer than
/// `(r1 + r2) * exclusion_ratio`.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Gravitational constant `G` in `F = G * m1 * m2 / r^2`.
    pub gravitational_constant: f64,
    /// A pair is skipped when `r1 + r2 > distance / exclusion_ratio`.
    pub exclusion_ratio: f64,
    /// Proportionality constant tying a particle's mass to its radius.
    pub mass_per_radius: f64,
    /// Smoothness constant of the speed-to-color saturating map.
    pub color_smoothness: f64,
    /// Maximum number of points a quadtree leaf holds before subdividing.
    pub leaf_capacity: usize,
    /// Multiple of the view width by which the cull/index region exceeds the view.
    pub overscan: f64,
    /// Worker count for the parallel phases. `None` selects the detected
    /// hardware concurrency, falling back to a single worker.
    pub workers: Option<usize>,
    /// Whether to rebuild the spatial index at the end of each step.
    pub build_index: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 6.674e2,
            exclusion_ratio: 20.0,
            mass_per_radius: 1000.0,
            color_smoothness: 0.01,
            leaf_capacity: 2,
            overscan: 20.0,
            workers: None,
            build_index: true,
        }
    }
}

impl SimConfig {
    pub fn new(
        gravitational_constant: Option<f64>,
        exclusion_ratio: Option<f64>,
        mass_per_radius: Option<f64>,
        color_smoothness: Option<f64>,
        leaf_capacity: Option<usize>,
        overscan: Option<f64>,
    ) -> Self {
        let default = SimConfig::default();
        Self {
            gravitational_constant: gravitational_constant.unwrap_or(default.gravitational_constant),
            exclusion_ratio: exclusion_ratio.unwrap_or(default.exclusion_ratio),
            mass_per_radius: mass_per_radius.unwrap_or(default.mass_per_radius),
            color_smoothness: color_smoothness.unwrap_or(default.color_smoothness),
            leaf_capacity: leaf_capacity.unwrap_or(default.leaf_capacity),
            overscan: overscan.unwrap_or(default.overscan),
            workers: default.workers,
            build_index: default.build_index,
        }
    }

    /// Checks the configuration for values that would make a step meaningless.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.gravitational_constant.is_finite() {
            return Err(SimulationError::InvalidConfig("gravitational_constant must be finite".to_string()));
        }
        if !(self.exclusion_ratio.is_finite() && self.exclusion_ratio > 0.0) {
            return Err(SimulationError::InvalidConfig("exclusion_ratio must be positive".to_string()));
        }
        if !(self.mass_per_radius.is_finite() && self.mass_per_radius != 0.0) {
            return Err(SimulationError::InvalidConfig("mass_per_radius must be finite and nonzero".to_string()));
        }
        if self.leaf_capacity == 0 {
            return Err(SimulationError::InvalidConfig("leaf_capacity must be at least 1".to_string()));
        }
        if !(self.overscan.is_finite() && self.overscan >= 1.0) {
            return Err(SimulationError::InvalidConfig("overscan must be at least 1.0".to_string()));
        }
        Ok(())
    }
}
