use std::io::{self, Write};

use flock_core::{Boid, FlockObserver, Vector2};
use serde::{Deserialize, Serialize};

/// Decimal places of the text output.
pub const DEFAULT_PRECISION: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl From<&Boid> for BoidState {
    fn from(boid: &Boid) -> Self {
        Self {
            x: boid.position.x,
            y: boid.position.y,
            vx: boid.velocity.x,
            vy: boid.velocity.y,
        }
    }
}

impl From<BoidState> for Boid {
    fn from(state: BoidState) -> Self {
        Boid::new(
            Vector2::new(state.x, state.y),
            Vector2::new(state.vx, state.vy),
        )
    }
}

/// One completed tick, serialised as a JSON line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickSnapshot {
    pub tick: u64,
    pub dt: f64,
    pub boids: Vec<BoidState>,
}

impl TickSnapshot {
    pub fn new(tick: u64, dt: f64, boids: &[Boid]) -> Self {
        Self {
            tick,
            dt,
            boids: boids.iter().map(BoidState::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `x y vx vy` per boid, fixed precision.
    #[default]
    Text,
    /// One [`TickSnapshot`] object per line.
    Json,
}

pub fn write_text<W: Write>(out: &mut W, boids: &[Boid], precision: usize) -> io::Result<()> {
    for boid in boids {
        writeln!(
            out,
            "{:.p$} {:.p$} {:.p$} {:.p$}",
            boid.position.x,
            boid.position.y,
            boid.velocity.x,
            boid.velocity.y,
            p = precision
        )?;
    }
    Ok(())
}

pub fn write_json_line<W: Write>(out: &mut W, snapshot: &TickSnapshot) -> io::Result<()> {
    serde_json::to_writer(&mut *out, snapshot)?;
    writeln!(out)
}

/// Writes every completed tick to `out` in the chosen format.
///
/// As an observer it cannot return errors, so the first write failure is
/// kept and later ticks are skipped; collect it with [`take_error`].
///
/// [`take_error`]: SnapshotWriter::take_error
pub struct SnapshotWriter<W: Write> {
    out: W,
    format: OutputFormat,
    precision: usize,
    error: Option<io::Error>,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            precision: DEFAULT_PRECISION,
            error: None,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn write_snapshot(&mut self, tick: u64, dt: f64, boids: &[Boid]) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => write_text(&mut self.out, boids, self.precision)?,
            OutputFormat::Json => {
                write_json_line(&mut self.out, &TickSnapshot::new(tick, dt, boids))?
            }
        }
        self.out.flush()
    }

    /// Return the first write error seen, if any.
    pub fn take_error(&mut self) -> io::Result<()> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FlockObserver for SnapshotWriter<W> {
    fn on_tick_end(&mut self, tick: u64, dt: f64, boids: &[Boid]) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_snapshot(tick, dt, boids) {
            log::error!("failed to write tick {tick}: {err}");
            self.error = Some(err);
        }
    }
}
