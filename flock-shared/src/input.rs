//! Whitespace-separated scenario input.
//!
//! ```text
//! cohesion_r separation_r separation_max alignment_r k_coh k_sep k_ali N
//! x y vx vy        (N times, any line layout)
//! dt               (one per line until end of input)
//! ```

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use flock_core::{Boid, FlockConfig, Vector2};

use crate::error::{InputError, InputResult};
use crate::params::{SimulationParams, HEADER_FIELDS};

const BOID_FIELDS: [&str; 4] = ["x", "y", "vx", "vy"];

/// Parameters and initial population read from the head of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub params: SimulationParams,
    pub boids: Vec<Boid>,
}

impl Scenario {
    pub fn config(&self) -> InputResult<FlockConfig> {
        Ok(self.params.to_config()?)
    }
}

pub struct InputReader<R> {
    reader: R,
    line: usize,
    tokens: VecDeque<String>,
}

impl<R: BufRead> InputReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            tokens: VecDeque::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Read the parameter header and every boid record.
    ///
    /// Whatever follows the last boid field on its line is discarded; the
    /// tick stream starts on the next line.
    pub fn read_scenario(&mut self) -> InputResult<Scenario> {
        let mut header = [0.0; 7];
        for (value, field) in header.iter_mut().zip(HEADER_FIELDS) {
            let token = self.require(field)?;
            *value = parse_real(field, &token)?;
        }

        let token = self.require("agent count")?;
        let count: usize = token.parse().map_err(|_| InputError::InvalidNumber {
            field: "agent count".to_owned(),
            token: token.clone(),
        })?;

        let mut boids = Vec::new();
        for index in 0..count {
            let mut values = [0.0; 4];
            for (value, name) in values.iter_mut().zip(BOID_FIELDS) {
                let Some(token) = self.next_token()? else {
                    return Err(InputError::AgentCountMismatch {
                        expected: count,
                        got: index,
                    });
                };
                *value = parse_real(&format!("boid {index} {name}"), &token)?;
            }
            let [x, y, vx, vy] = values;
            boids.push(Boid::new(Vector2::new(x, y), Vector2::new(vx, vy)));
        }

        if !self.tokens.is_empty() {
            log::warn!(
                "ignoring {} trailing token(s) on line {}",
                self.tokens.len(),
                self.line
            );
            self.tokens.clear();
        }
        log::debug!("read {} boids over {} lines", boids.len(), self.line);

        Ok(Scenario {
            params: SimulationParams::from_header(header),
            boids,
        })
    }

    /// Next time delta with the line it came from. Blank lines are skipped.
    pub fn next_delta(&mut self) -> InputResult<Option<(usize, f64)>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let token = buf.trim();
            if token.is_empty() {
                continue;
            }
            let dt = token
                .parse::<f64>()
                .map_err(|source| InputError::InvalidDelta {
                    line: self.line,
                    token: token.to_owned(),
                    source,
                })?;
            return Ok(Some((self.line, dt)));
        }
    }

    pub fn deltas(&mut self) -> impl Iterator<Item = InputResult<(usize, f64)>> + '_ {
        std::iter::from_fn(move || self.next_delta().transpose())
    }

    fn next_token(&mut self) -> InputResult<Option<String>> {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return Ok(Some(token));
            }
            let mut buf = String::new();
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            self.tokens
                .extend(buf.split_whitespace().map(str::to_owned));
        }
    }

    fn require(&mut self, field: &str) -> InputResult<String> {
        self.next_token()?.ok_or_else(|| InputError::UnexpectedEof {
            expected: field.to_owned(),
        })
    }
}

fn parse_real(field: &str, token: &str) -> InputResult<f64> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::InvalidNumber {
            field: field.to_owned(),
            token: token.to_owned(),
        }),
    }
}

/// Write a scenario in the layout [`InputReader::read_scenario`] accepts.
pub fn write_scenario<W: Write>(
    out: &mut W,
    params: &SimulationParams,
    boids: &[Boid],
) -> io::Result<()> {
    let header: Vec<String> = params.header().iter().map(f64::to_string).collect();
    writeln!(out, "{}", header.join(" "))?;
    writeln!(out, "{}", boids.len())?;
    for boid in boids {
        writeln!(
            out,
            "{} {} {} {}",
            boid.position.x, boid.position.y, boid.velocity.x, boid.velocity.y
        )?;
    }
    Ok(())
}
