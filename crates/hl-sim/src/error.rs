//! Error types for simulation operations.

use hl_core::HlError;
use thiserror::Error;

/// Errors encountered during transient simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] HlError),

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: String },
}

pub type SimResult<T> = Result<T, SimError>;
