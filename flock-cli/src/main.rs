use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flock_cli::{GenerateOptions, SimulateOptions};
use flock_shared::{OutputFormat, SimulationParams, DEFAULT_PRECISION};

#[derive(Parser, Debug)]
#[command(author, version, about = "Discrete-time boid flocking simulator", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario read from stdin (default)
    Simulate(SimulateArgs),
    /// Read `seed count min max` from stdin and print `count` draws in min..=max
    Rng,
    /// Write a random scenario to stdout
    Generate(GenerateArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// `x y vx vy` per boid and tick
    Text,
    /// One JSON object per tick
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Decimal places for text output
    #[arg(short, long, default_value_t = DEFAULT_PRECISION)]
    precision: usize,

    /// JSON file with parameters that replace the input header
    #[arg(long)]
    params: Option<PathBuf>,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            format: Format::Text,
            precision: DEFAULT_PRECISION,
            params: None,
        }
    }
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Number of boids
    #[arg(short = 'n', long, default_value_t = 20)]
    agents: usize,

    /// Generator seed
    #[arg(short, long, default_value_t = 5489)]
    seed: u32,

    /// Half-width of the square positions are drawn from
    #[arg(long, default_value_t = 20.0)]
    extent: f64,

    /// Largest velocity component
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Number of delta lines to append
    #[arg(short, long, default_value_t = 10)]
    ticks: usize,

    /// Value of every delta line
    #[arg(long, default_value_t = 0.1)]
    dt: f64,

    /// JSON file with the parameters to write in the header
    #[arg(long)]
    params: Option<PathBuf>,
}

fn load_params(path: &Path) -> Result<SimulationParams> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open parameter file {}", path.display()))?;
    let params = SimulationParams::from_json_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse parameter file {}", path.display()))?;
    log::debug!("Loaded {:?} from {}", params, path.display());
    Ok(params)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the simulation output
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());

    match args.command.unwrap_or(Command::Simulate(SimulateArgs::default())) {
        Command::Simulate(sim) => {
            let params = sim.params.as_deref().map(load_params).transpose()?;
            let options = SimulateOptions {
                format: sim.format.into(),
                precision: sim.precision,
                params,
            };
            flock_cli::simulate(stdin, stdout, &options).context("Simulation error")?;
        }
        Command::Rng => {
            flock_cli::draw(stdin, stdout).context("Generator error")?;
        }
        Command::Generate(generate) => {
            let params = match generate.params.as_deref() {
                Some(path) => load_params(path)?,
                None => SimulationParams::default(),
            };
            let options = GenerateOptions {
                agents: generate.agents,
                seed: generate.seed,
                extent: generate.extent,
                speed: generate.speed,
                ticks: generate.ticks,
                dt: generate.dt,
                params,
            };
            flock_cli::generate(stdout, &options).context("Failed to generate scenario")?;
        }
    }

    Ok(())
}
