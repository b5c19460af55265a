//! The step engine.
//!
//! # Tick
//!
//! 1. Forces: for every boid, each rule with at least one other boid inside
//!    its radius adds its force once. Reads `current`.
//! 2. Integrate: `v' = v + F * dt`, then `p' = p + v' * dt`. Writes `next`.
//! 3. Swap: `next` becomes `current` and the old buffer is reused.
//!
//! Forces only ever read the snapshot frozen at the start of the tick, so the
//! result does not depend on the order boids are visited in.

use crate::error::{FlockError, FlockResult};
use crate::observer::FlockObserver;
use crate::{Boid, FlockConfig, Vector2};

pub struct Flock {
    config: FlockConfig,
    current: Vec<Boid>,
    next: Vec<Boid>,
    forces: Vec<Vector2>,
    tick: u64,
}

impl Flock {
    pub fn new(config: FlockConfig, boids: Vec<Boid>) -> Self {
        log::debug!("flock of {} boids, {:?}", boids.len(), config);
        let next = boids.clone();
        let forces = vec![Vector2::ZERO; boids.len()];
        Self {
            config,
            current: boids,
            next,
            forces,
            tick: 0,
        }
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// The latest completed snapshot.
    pub fn boids(&self) -> &[Boid] {
        &self.current
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Total force on `boids()[index]` as the next tick would apply it.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn net_force(&self, index: usize) -> Vector2 {
        net_force(&self.config, &self.current, index).0
    }

    /// Advance every boid by `dt` seconds and return the new snapshot.
    ///
    /// A non-positive or non-finite `dt` is rejected before anything is
    /// touched.
    pub fn step(&mut self, dt: f64) -> FlockResult<&[Boid]> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(FlockError::InvalidTimeDelta(dt));
        }

        let steered = self.accumulate_forces();

        for ((next, boid), force) in self
            .next
            .iter_mut()
            .zip(&self.current)
            .zip(&self.forces)
        {
            let velocity = boid.velocity + *force * dt;
            let position = boid.position + velocity * dt;
            *next = Boid::new(position, velocity);
        }

        std::mem::swap(&mut self.current, &mut self.next);
        self.tick += 1;
        log::trace!("tick {} done, dt {dt}, {steered} boids steered", self.tick);

        Ok(self.current.as_slice())
    }

    /// Step once per delta, reporting each snapshot to `observer`.
    ///
    /// Stops at the first invalid delta. Returns the number of ticks run.
    pub fn run<I, O>(&mut self, deltas: I, observer: &mut O) -> FlockResult<u64>
    where
        I: IntoIterator<Item = f64>,
        O: FlockObserver + ?Sized,
    {
        let start = self.tick;
        for dt in deltas {
            observer.on_tick_start(self.tick + 1, dt);
            self.step(dt)?;
            observer.on_tick_end(self.tick, dt, &self.current);
        }
        let ran = self.tick - start;
        observer.on_run_end(ran);
        Ok(ran)
    }

    /// Fill `forces` from `current` and return how many boids had at least
    /// one rule active.
    #[cfg(feature = "parallel")]
    fn accumulate_forces(&mut self) -> usize {
        use rayon::prelude::*;

        let config = &self.config;
        let boids = &self.current;
        self.forces
            .par_iter_mut()
            .enumerate()
            .map(|(i, force)| {
                let (total, steered) = net_force(config, boids, i);
                *force = total;
                usize::from(steered)
            })
            .sum::<usize>()
    }

    #[cfg(not(feature = "parallel"))]
    fn accumulate_forces(&mut self) -> usize {
        let config = &self.config;
        let boids = &self.current;
        let mut count = 0;
        for (i, force) in self.forces.iter_mut().enumerate() {
            let (total, steered) = net_force(config, boids, i);
            *force = total;
            count += usize::from(steered);
        }
        count
    }
}

/// Sum of the rules that have a neighbour of `boids[index]` inside their
/// radius, and whether any rule did. Each rule contributes at most once.
fn net_force(config: &FlockConfig, boids: &[Boid], index: usize) -> (Vector2, bool) {
    let rules = config.rules();
    let radii = rules.map(|rule| rule.radius());
    let subject = boids[index].position;
    let mut active = [false; 3];

    for (j, other) in boids.iter().enumerate() {
        if j == index {
            continue;
        }
        let distance = subject.distance(&other.position);
        for (flag, radius) in active.iter_mut().zip(radii) {
            *flag |= distance <= radius;
        }
        if active.iter().all(|&a| a) {
            break;
        }
    }

    let mut total = Vector2::ZERO;
    for (rule, _) in rules.iter().zip(active).filter(|(_, on)| *on) {
        total += rule.compute_force(boids, index);
    }
    (total, active.iter().any(|&a| a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::History;
    use crate::{Alignment, Cohesion, Separation, SteeringRule};

    fn boid(px: f64, py: f64, vx: f64, vy: f64) -> Boid {
        Boid::new(Vector2::new(px, py), Vector2::new(vx, vy))
    }

    fn cohesion_only(radius: f64, gain: f64) -> FlockConfig {
        FlockConfig::new(
            Cohesion::new(radius, gain),
            Separation::new(radius, 0.0, 1.0),
            Alignment::new(radius, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_single_boid_moves_in_straight_line() {
        let mut flock = Flock::new(FlockConfig::default(), vec![boid(0.0, 0.0, 1.0, 0.0)]);

        let state = flock.step(1.0).unwrap();
        assert_eq!(state[0].position, Vector2::new(1.0, 0.0));
        assert_eq!(state[0].velocity, Vector2::new(1.0, 0.0));

        for _ in 0..9 {
            flock.step(1.0).unwrap();
        }
        assert_eq!(flock.boids()[0].position, Vector2::new(10.0, 0.0));
        assert_eq!(flock.boids()[0].velocity, Vector2::new(1.0, 0.0));
        assert_eq!(flock.tick(), 10);
    }

    #[test]
    fn test_isolated_boids_feel_no_force() {
        let flock = Flock::new(
            FlockConfig::default(),
            vec![boid(0.0, 0.0, 1.0, 1.0), boid(1000.0, 0.0, -1.0, 0.0)],
        );
        assert_eq!(flock.net_force(0), Vector2::ZERO);
        assert_eq!(flock.net_force(1), Vector2::ZERO);
    }

    #[test]
    fn test_position_uses_updated_velocity() {
        // separation only: boid 0 feels (0.5, 0)
        let config = FlockConfig::new(
            Cohesion::new(0.0, 0.0),
            Separation::new(5.0, 1.0, 100.0),
            Alignment::new(0.0, 0.0),
        )
        .unwrap();
        let mut flock = Flock::new(
            config,
            vec![boid(0.0, 0.0, 0.0, 0.0), boid(2.0, 0.0, 0.0, 0.0)],
        );

        let state = flock.step(2.0).unwrap();
        // v = 0 + 0.5 * 2 = 1, p = 0 + 1 * 2 = 2
        assert_eq!(state[0].velocity, Vector2::new(1.0, 0.0));
        assert_eq!(state[0].position, Vector2::new(2.0, 0.0));
        assert_eq!(state[1].velocity, Vector2::new(-1.0, 0.0));
        assert_eq!(state[1].position, Vector2::new(0.0, 0.0));
    }

    #[test]
    fn test_each_rule_applied_once_per_tick() {
        let config = FlockConfig::default();
        let boids = vec![
            boid(0.0, 0.0, 1.0, 0.0),
            boid(1.0, 0.0, 0.0, 1.0),
            boid(0.0, 1.0, -1.0, 0.0),
            boid(1.0, 1.0, 0.0, -1.0),
        ];
        let flock = Flock::new(config, boids.clone());

        let expected = config.cohesion.compute_force(&boids, 0)
            + config.separation.compute_force(&boids, 0)
            + config.alignment.compute_force(&boids, 0);
        assert_eq!(flock.net_force(0), expected);
    }

    #[test]
    fn test_rule_gated_by_its_own_radius() {
        // only the cohesion radius reaches the neighbour
        let config = FlockConfig::new(
            Cohesion::new(5.0, 1.0),
            Separation::new(1.0, 1.0, 10.0),
            Alignment::new(1.0, 1.0),
        )
        .unwrap();
        let boids = vec![boid(0.0, 0.0, 3.0, 0.0), boid(4.0, 0.0, 0.0, 0.0)];
        let flock = Flock::new(config, boids.clone());

        assert_eq!(
            flock.net_force(0),
            config.cohesion.compute_force(&boids, 0)
        );
        assert_eq!(flock.net_force(0), Vector2::new(0.8, 0.0));
    }

    #[test]
    fn test_accumulate_counts_steered_boids() {
        let mut flock = Flock::new(
            FlockConfig::default(),
            vec![
                boid(0.0, 0.0, 0.0, 0.0),
                boid(3.0, 0.0, 0.0, 0.0),
                boid(500.0, 0.0, 0.0, 0.0),
            ],
        );
        assert_eq!(flock.accumulate_forces(), 2);
        assert_eq!(flock.forces[2], Vector2::ZERO);
    }

    #[test]
    fn test_forces_read_frozen_snapshot() {
        let boids = vec![
            boid(0.0, 0.0, 0.0, 0.0),
            boid(3.0, 0.0, 0.0, 0.0),
            boid(0.0, 4.0, 1.0, 0.0),
        ];
        let config = FlockConfig::default();
        let reversed: Vec<Boid> = boids.iter().rev().copied().collect();

        let mut forward = Flock::new(config, boids);
        let mut backward = Flock::new(config, reversed);
        forward.step(0.5).unwrap();
        backward.step(0.5).unwrap();

        for (a, b) in forward.boids().iter().zip(backward.boids().iter().rev()) {
            assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
            assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
            assert_eq!(a.velocity.x.to_bits(), b.velocity.x.to_bits());
            assert_eq!(a.velocity.y.to_bits(), b.velocity.y.to_bits());
        }
    }

    #[test]
    fn test_invalid_delta_leaves_state_untouched() {
        let mut flock = Flock::new(FlockConfig::default(), vec![boid(1.0, 2.0, 3.0, 4.0)]);
        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                flock.step(dt),
                Err(FlockError::InvalidTimeDelta(_))
            ));
        }
        assert_eq!(flock.tick(), 0);
        assert_eq!(flock.boids()[0], boid(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_empty_flock_steps() {
        let mut flock = Flock::new(FlockConfig::default(), Vec::new());
        assert!(flock.is_empty());
        assert!(flock.step(1.0).unwrap().is_empty());
        assert_eq!(flock.tick(), 1);
    }

    #[test]
    fn test_cohesion_pair_converges() {
        let mut flock = Flock::new(
            cohesion_only(50.0, 2.0),
            vec![boid(-10.0, 0.0, 0.0, 0.0), boid(10.0, 0.0, 0.0, 0.0)],
        );

        let mut distance = 20.0;
        let mut ticks = 0;
        while distance >= 1.0 {
            flock.step(0.1).unwrap();
            let boids = flock.boids();
            let now = boids[0].position.distance(&boids[1].position);
            assert!(now < distance, "distance grew from {distance} to {now}");
            distance = now;
            ticks += 1;
            assert!(ticks < 200, "pair did not converge");
        }
    }

    #[test]
    fn test_run_reports_every_snapshot() {
        let mut flock = Flock::new(FlockConfig::default(), vec![boid(0.0, 0.0, 1.0, 0.0)]);
        let mut history = History::default();

        let ran = flock.run([1.0, 0.5, 0.5], &mut history).unwrap();

        assert_eq!(ran, 3);
        assert_eq!(history.snapshots.len(), 3);
        assert_eq!(history.snapshots[0][0].position, Vector2::new(1.0, 0.0));
        assert_eq!(history.snapshots[2][0].position, Vector2::new(2.0, 0.0));
    }

    #[test]
    fn test_run_stops_at_invalid_delta() {
        let mut flock = Flock::new(FlockConfig::default(), vec![boid(0.0, 0.0, 1.0, 0.0)]);
        let mut history = History::default();

        let err = flock.run([1.0, -1.0, 1.0], &mut history).unwrap_err();

        assert_eq!(err, FlockError::InvalidTimeDelta(-1.0));
        assert_eq!(history.snapshots.len(), 1);
        assert_eq!(flock.tick(), 1);
    }
}
