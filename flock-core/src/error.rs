use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FlockError {
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("time delta must be a positive finite number, got {0}")]
    InvalidTimeDelta(f64),

    #[error("empty range: min {min} is greater than max {max}")]
    EmptyRange { min: u32, max: u32 },
}

pub type FlockResult<T> = Result<T, FlockError>;
