//! Callbacks for whoever consumes the per-tick snapshots.

use crate::Boid;

/// Hooks invoked by [`Flock::run`][crate::Flock::run].
///
/// All methods default to no-ops. `on_tick_end` only ever sees a fully
/// integrated snapshot.
pub trait FlockObserver {
    /// Called before forces are computed. `tick` is the number of the tick
    /// about to run, starting at 1.
    fn on_tick_start(&mut self, _tick: u64, _dt: f64) {}

    /// Called with the new snapshot once tick `tick` has completed.
    fn on_tick_end(&mut self, _tick: u64, _dt: f64, _boids: &[Boid]) {}

    /// Called once after the last tick of a run.
    fn on_run_end(&mut self, _ticks: u64) {}
}

/// Keeps a copy of every snapshot it is shown.
#[derive(Debug, Default)]
pub struct History {
    pub snapshots: Vec<Vec<Boid>>,
}

impl FlockObserver for History {
    fn on_tick_end(&mut self, _tick: u64, _dt: f64, boids: &[Boid]) {
        self.snapshots.push(boids.to_vec());
    }
}
