use std::num::ParseFloatError;

use flock_core::FlockError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("invalid {field}: {token:?}")]
    InvalidNumber { field: String, token: String },

    #[error("expected {expected} boids, input ended after {got}")]
    AgentCountMismatch { expected: usize, got: usize },

    #[error("line {line}: invalid time delta {token:?}")]
    InvalidDelta {
        line: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error(transparent)]
    Config(#[from] FlockError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type InputResult<T> = Result<T, InputError>;
