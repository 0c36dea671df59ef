//! Error types for envelope calculations.

use hl_core::HlError;
use hl_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] HlError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("No convergence: {what}")]
    NoConvergence { what: String },
}

pub type EnvelopeResult<T> = Result<T, EnvelopeError>;
