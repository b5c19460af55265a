//! The three steering rules.
//!
//! Every rule reads the whole population and returns the force acting on a
//! single boid. Degenerate geometry (no neighbour in range, two boids on the
//! same spot) resolves to a zero contribution so the result is always finite.

use crate::{Boid, Vector2};

/// A steering force computed from the population around one boid.
pub trait SteeringRule {
    fn name(&self) -> &'static str;

    /// Neighbour cutoff used by the engine to decide whether the rule applies.
    fn radius(&self) -> f64;

    /// Force on `boids[index]`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    fn compute_force(&self, boids: &[Boid], index: usize) -> Vector2;
}

/// Pulls a boid toward the centroid of the other boids within `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cohesion {
    pub radius: f64,
    pub gain: f64,
}

impl Cohesion {
    pub fn new(radius: f64, gain: f64) -> Self {
        Self { radius, gain }
    }
}

impl SteeringRule for Cohesion {
    fn name(&self) -> &'static str {
        "cohesion"
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn compute_force(&self, boids: &[Boid], index: usize) -> Vector2 {
        let subject = boids[index].position;
        let mut center = Vector2::ZERO;
        let mut count = 0usize;

        for (i, other) in boids.iter().enumerate() {
            if i != index && other.position.distance(&subject) <= self.radius {
                center += other.position;
                count += 1;
            }
        }

        // With radius zero every neighbour sits on the subject and the
        // steering vector is zero anyway.
        if count == 0 || self.radius <= 0.0 {
            return Vector2::ZERO;
        }

        center /= count as f64;
        let steering = center - subject;
        if steering.magnitude() <= self.radius {
            (steering / self.radius) * self.gain
        } else {
            Vector2::ZERO
        }
    }
}

/// Inverse-distance weighted sum of the offsets to the other boids within
/// `radius`, capped at `max_force` before the gain is applied.
///
/// Each term points from the boid to its neighbour, so a negative gain is
/// what pushes boids apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    pub radius: f64,
    pub gain: f64,
    pub max_force: f64,
}

impl Separation {
    pub fn new(radius: f64, gain: f64, max_force: f64) -> Self {
        Self {
            radius,
            gain,
            max_force,
        }
    }
}

impl SteeringRule for Separation {
    fn name(&self) -> &'static str {
        "separation"
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn compute_force(&self, boids: &[Boid], index: usize) -> Vector2 {
        let subject = boids[index].position;
        let mut force = Vector2::ZERO;

        for (i, other) in boids.iter().enumerate() {
            if i == index {
                continue;
            }
            let offset = other.position - subject;
            let sqr = offset.sqr_magnitude();
            if sqr.sqrt() > self.radius {
                continue;
            }
            // A coincident neighbour has no direction.
            if sqr == 0.0 {
                continue;
            }
            let term = offset / sqr;
            if term.is_finite() {
                force += term;
            }
        }

        if !force.is_finite() {
            log::trace!("separation overflowed for boid {index}, dropping force");
            return Vector2::ZERO;
        }

        force.clamp_magnitude(self.max_force) * self.gain
    }
}

/// Steers a boid toward the mean velocity of every boid within `radius`,
/// itself included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub radius: f64,
    pub gain: f64,
}

impl Alignment {
    pub fn new(radius: f64, gain: f64) -> Self {
        Self { radius, gain }
    }
}

impl SteeringRule for Alignment {
    fn name(&self) -> &'static str {
        "alignment"
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn compute_force(&self, boids: &[Boid], index: usize) -> Vector2 {
        let subject = boids[index].position;
        let mut sum = Vector2::ZERO;
        let mut count = 0usize;

        for other in boids {
            if other.position.distance(&subject) <= self.radius {
                sum += other.velocity;
                count += 1;
            }
        }

        if count == 0 {
            return Vector2::ZERO;
        }

        (sum / count as f64) * self.gain
    }
}
