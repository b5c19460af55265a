//! Text and JSON boundary of the flocking simulator: scenario input,
//! parameter records and per-tick output.

pub mod error;
pub mod input;
pub mod output;
pub mod params;

pub use error::{InputError, InputResult};
pub use input::{write_scenario, InputReader, Scenario};
pub use output::{
    write_json_line, write_text, BoidState, OutputFormat, SnapshotWriter, TickSnapshot,
    DEFAULT_PRECISION,
};
pub use params::{SimulationParams, HEADER_FIELDS};
