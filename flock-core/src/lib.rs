//! Cohesion, separation and alignment steering for point boids.
//!
//! A [`Flock`] owns a population and a fixed [`FlockConfig`]. Each call to
//! [`Flock::step`] computes every boid's steering force from the snapshot of
//! the previous tick and integrates with semi-implicit Euler into a second
//! buffer, so no boid ever sees a neighbour's half-updated state.
//!
//! ```rust
//! use flock_core::{Boid, Flock, FlockConfig, Vector2};
//!
//! let boids = vec![Boid::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0))];
//! let mut flock = Flock::new(FlockConfig::default(), boids);
//! let state = flock.step(1.0)?;
//! assert_eq!(state[0].position, Vector2::new(1.0, 0.0));
//! # Ok::<(), flock_core::FlockError>(())
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                               |
//! |------------|------------------------------------------------------|
//! | `parallel` | Computes per-boid forces on rayon's thread pool.     |

pub mod boid;
pub mod config;
pub mod error;
pub mod flock;
pub mod observer;
pub mod rng;
pub mod rules;
pub mod vector;

pub use boid::Boid;
pub use config::FlockConfig;
pub use error::{FlockError, FlockResult};
pub use flock::Flock;
pub use observer::{FlockObserver, History};
pub use rng::MersenneTwister;
pub use rules::{Alignment, Cohesion, Separation, SteeringRule};
pub use vector::Vector2;
