use std::io::Read;

use flock_core::{Alignment, Cohesion, FlockConfig, FlockError, Separation};
use serde::{Deserialize, Serialize};

use crate::error::InputResult;

/// Header field names in input order.
pub const HEADER_FIELDS: [&str; 7] = [
    "cohesion radius",
    "separation radius",
    "separation max force",
    "alignment radius",
    "cohesion gain",
    "separation gain",
    "alignment gain",
];

/// The numeric header of a scenario, also loadable from JSON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationParams {
    pub cohesion_radius: f64,
    pub separation_radius: f64,
    pub separation_max_force: f64,
    pub alignment_radius: f64,
    pub cohesion_gain: f64,
    pub separation_gain: f64,
    pub alignment_gain: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self::from(&FlockConfig::default())
    }
}

impl SimulationParams {
    /// Build from values in [`HEADER_FIELDS`] order.
    pub fn from_header(values: [f64; 7]) -> Self {
        let [
            cohesion_radius,
            separation_radius,
            separation_max_force,
            alignment_radius,
            cohesion_gain,
            separation_gain,
            alignment_gain,
        ] = values;
        Self {
            cohesion_radius,
            separation_radius,
            separation_max_force,
            alignment_radius,
            cohesion_gain,
            separation_gain,
            alignment_gain,
        }
    }

    /// Values in [`HEADER_FIELDS`] order.
    pub fn header(&self) -> [f64; 7] {
        [
            self.cohesion_radius,
            self.separation_radius,
            self.separation_max_force,
            self.alignment_radius,
            self.cohesion_gain,
            self.separation_gain,
            self.alignment_gain,
        ]
    }

    pub fn from_json_reader<R: Read>(reader: R) -> InputResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_config(&self) -> Result<FlockConfig, FlockError> {
        FlockConfig::try_from(*self)
    }
}

impl TryFrom<SimulationParams> for FlockConfig {
    type Error = FlockError;

    fn try_from(params: SimulationParams) -> Result<Self, Self::Error> {
        FlockConfig::new(
            Cohesion::new(params.cohesion_radius, params.cohesion_gain),
            Separation::new(
                params.separation_radius,
                params.separation_gain,
                params.separation_max_force,
            ),
            Alignment::new(params.alignment_radius, params.alignment_gain),
        )
    }
}

impl From<&FlockConfig> for SimulationParams {
    fn from(config: &FlockConfig) -> Self {
        Self {
            cohesion_radius: config.cohesion.radius,
            separation_radius: config.separation.radius,
            separation_max_force: config.separation.max_force,
            alignment_radius: config.alignment.radius,
            cohesion_gain: config.cohesion.gain,
            separation_gain: config.separation.gain,
            alignment_gain: config.alignment.gain,
        }
    }
}
