//! Drivers behind the `flock` binary, generic over their input and output so
//! they can run against in-memory buffers.

use std::io::{BufRead, Read, Write};

use anyhow::{ensure, Context, Result};
use flock_core::{Boid, Flock, FlockError, FlockObserver, MersenneTwister, Vector2};
use flock_shared::{
    write_scenario, InputError, InputReader, OutputFormat, SimulationParams, SnapshotWriter,
    DEFAULT_PRECISION,
};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub format: OutputFormat,
    pub precision: usize,
    /// Replaces the parameters read from the input header.
    pub params: Option<SimulationParams>,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            precision: DEFAULT_PRECISION,
            params: None,
        }
    }
}

/// Read a scenario and step it once per delta line, writing each snapshot.
///
/// Returns the number of completed ticks. Any malformed input or rejected
/// delta ends the run with an error; snapshots of earlier ticks have already
/// been written.
pub fn simulate<R: BufRead, W: Write>(
    input: R,
    output: W,
    options: &SimulateOptions,
) -> Result<u64> {
    let mut input = InputReader::new(input);
    let scenario = input.read_scenario().context("Failed to read scenario")?;

    let config = match options.params {
        Some(params) => {
            log::info!("Using supplied parameters instead of the input header");
            params.to_config().map_err(InputError::from)
        }
        None => scenario.config(),
    }
    .context("Invalid simulation parameters")?;

    log::info!("Simulating {} boids", scenario.boids.len());
    let mut flock = Flock::new(config, scenario.boids);
    let mut writer = SnapshotWriter::new(output, options.format).with_precision(options.precision);

    for delta in input.deltas() {
        let (line, dt) = delta.context("Failed to read time delta")?;
        let tick = flock.tick() + 1;

        writer.on_tick_start(tick, dt);
        flock
            .step(dt)
            .with_context(|| format!("Tick {tick} (line {line}) failed"))?;
        writer.on_tick_end(tick, dt, flock.boids());
        writer
            .take_error()
            .with_context(|| format!("Failed to write tick {tick}"))?;
    }

    writer.on_run_end(flock.tick());
    log::info!("Completed {} ticks", flock.tick());
    Ok(flock.tick())
}

/// Read `seed count min max` and print `count` draws in `min..=max`.
pub fn draw<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .context("Failed to read generator input")?;

    let mut tokens = text.split_whitespace();
    let mut field = |name: &str| -> Result<u32> {
        let token = tokens.next().with_context(|| format!("Missing {name}"))?;
        token
            .parse()
            .with_context(|| format!("Invalid {name}: {token:?}"))
    };
    let seed = field("seed")?;
    let count = field("count")?;
    let min = field("min")?;
    let max = field("max")?;
    if min > max {
        return Err(FlockError::EmptyRange { min, max }.into());
    }

    log::debug!("Drawing {count} values in {min}..={max} with seed {seed}");
    let mut rng = MersenneTwister::new(seed);
    for _ in 0..count {
        writeln!(output, "{}", rng.range(min, max)?)?;
    }
    output.flush()?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub agents: usize,
    pub seed: u32,
    /// Positions are drawn from `[-extent, extent]` on both axes.
    pub extent: f64,
    /// Velocities are drawn from `[-speed, speed]` on both axes.
    pub speed: f64,
    pub ticks: usize,
    pub dt: f64,
    pub params: SimulationParams,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            agents: 20,
            seed: 5489,
            extent: 20.0,
            speed: 1.0,
            ticks: 10,
            dt: 0.1,
            params: SimulationParams::default(),
        }
    }
}

/// Write a random scenario followed by `ticks` delta lines.
pub fn generate<W: Write>(mut output: W, options: &GenerateOptions) -> Result<()> {
    ensure!(
        options.extent.is_finite() && options.extent >= 0.0,
        "Extent must be a non-negative number, got {}",
        options.extent
    );
    ensure!(
        options.speed.is_finite() && options.speed >= 0.0,
        "Speed must be a non-negative number, got {}",
        options.speed
    );
    ensure!(
        options.ticks == 0 || (options.dt.is_finite() && options.dt > 0.0),
        "Time delta must be positive, got {}",
        options.dt
    );
    options
        .params
        .to_config()
        .context("Invalid simulation parameters")?;

    let mut rng = MersenneTwister::new(options.seed);
    let (e, v) = (options.extent, options.speed);
    let boids: Vec<Boid> = (0..options.agents)
        .map(|_| {
            let position = Vector2::new(rng.gen_range(-e..=e), rng.gen_range(-e..=e));
            let velocity = Vector2::new(rng.gen_range(-v..=v), rng.gen_range(-v..=v));
            Boid::new(position, velocity)
        })
        .collect();

    write_scenario(&mut output, &options.params, &boids)?;
    for _ in 0..options.ticks {
        writeln!(output, "{}", options.dt)?;
    }
    output.flush()?;
    Ok(())
}
