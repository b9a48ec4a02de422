use crate::errors::SimulationError;
use crate::math::Vec2;

/// An RGBA color derived from a particle's state for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
}

/// A point mass in 2D space.
///
/// `acceleration` is reset and re-accumulated every simulation step. The
/// accumulated value is pre-multiplied by the step's `dt`, so it is the
/// velocity increment for that step rather than an instantaneous
/// acceleration; it must not be reused as a true acceleration elsewhere.
///
/// `radius` and `mass` are fixed at creation and tied together by the
/// `mass_per_radius` constant, so a particle's visual size always reflects
/// its mass. A negative mass models a repulsive "anti-mass" particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub radius: f64,
    pub mass: f64,
    pub color: Color,
}

impl Particle {
    /// Creates a particle at rest with `mass = mass_per_radius * radius`.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is non-positive or non-finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody2d::math::Vec2;
    /// use nbody2d::particles::Particle;
    ///
    /// let particle = Particle::new(Vec2::new(0.0, 0.0), 1.0, 1000.0)
    ///     .expect("Failed to create particle");
    /// assert_eq!(particle.mass, 1000.0);
    /// assert_eq!(particle.velocity, Vec2::ZERO);
    /// ```
    pub fn new(position: Vec2, radius: f64, mass_per_radius: f64) -> Result<Self, SimulationError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimulationError::InvalidRadius);
        }
        Ok(Particle {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            radius,
            mass: mass_per_radius * radius,
            color: Color::WHITE,
        })
    }

    /// Creates an anti-mass particle: same radius, negated mass.
    pub fn new_anti(position: Vec2, radius: f64, mass_per_radius: f64) -> Result<Self, SimulationError> {
        let mut particle = Particle::new(position, radius, mass_per_radius)?;
        particle.mass = -particle.mass;
        Ok(particle)
    }

    /// Computes the pairwise gravitational acceleration increments for this
    /// particle and `other` over a step of length `dt`.
    ///
    /// Returns `None` when the pair is inside the near-field exclusion zone,
    /// i.e. when `self.radius + other.radius > distance / exclusion_ratio`.
    /// Skipping those pairs prevents force singularities and runaway
    /// velocities at small separations; it is a designed no-op, not a
    /// collision response. A zero separation always falls inside the zone.
    ///
    /// The two increments are equal and opposite (Newton's third law) and
    /// are already scaled by `dt`.
    pub fn acceleration_delta(
        &self,
        other: &Particle,
        g: f64,
        exclusion_ratio: f64,
        dt: f64,
    ) -> Option<(Vec2, Vec2)> {
        let displacement = other.position - self.position;
        let distance_squared = displacement.magnitude_squared();
        let distance = distance_squared.sqrt();

        if self.radius + other.radius > distance / exclusion_ratio {
            return None;
        }

        let force_magnitude = g * self.mass * other.mass / distance_squared;
        let direction = displacement * (1.0 / distance);

        let delta_self = direction * (force_magnitude / self.mass) * dt;
        let delta_other = -(direction * (force_magnitude / other.mass) * dt);
        Some((delta_self, delta_other))
    }

    /// Accumulates the mutual gravitational acceleration into both particles.
    ///
    /// No-op when the pair falls inside the near-field exclusion zone.
    pub fn accumulate_mutual_acceleration(
        a: &mut Particle,
        b: &mut Particle,
        g: f64,
        exclusion_ratio: f64,
        dt: f64,
    ) {
        if let Some((delta_a, delta_b)) = a.acceleration_delta(b, g, exclusion_ratio, dt) {
            a.acceleration += delta_a;
            b.acceleration += delta_b;
        }
    }

    /// Advances the particle by one step of semi-implicit Euler.
    ///
    /// The stored acceleration is already dt-scaled, so it is applied to the
    /// velocity directly; the position then advances by `velocity * dt`. The
    /// color is recomputed from the new speed.
    pub fn integrate(&mut self, dt: f64, color_smoothness: f64) {
        self.velocity += self.acceleration;

        let channel = speed_channel(self.velocity.magnitude(), color_smoothness);
        self.color = if self.mass > 0.0 {
            Color { r: channel, g: 0, b: 255, a: 255 }
        } else {
            Color { r: channel, g: 255, b: 0, a: 255 }
        };

        self.position += self.velocity * dt;
    }
}

/// Maps a speed magnitude onto a single color channel via the saturating
/// curve `255 * k * v / (1 + k * v)`.
///
/// The map is monotonic, sends zero speed to 0, and approaches 255 as the
/// speed grows without bound.
pub fn speed_channel(speed: f64, smoothness: f64) -> u8 {
    (255.0 * smoothness * speed / (1.0 + smoothness * speed)) as u8
}
