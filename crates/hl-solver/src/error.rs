//! Error types for solver operations.

use hl_core::error::HlError;
use thiserror::Error;

/// Errors that can occur while assembling or solving a system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] HlError),

    #[error("Dimension mismatch: {what}")]
    DimensionMismatch { what: String },

    #[error("Singular system: {dim}x{dim} matrix is not invertible to working precision")]
    SingularSystem { dim: usize },

    #[error("Unknown name '{name}' in {context}")]
    UnknownName { name: String, context: &'static str },

    #[error("Non-physical state: {what}")]
    NonPhysical { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Errors a fixed-point loop absorbs by stopping at its last stable
    /// iterate instead of propagating.
    pub fn aborts_iteration(&self) -> bool {
        matches!(
            self,
            SolverError::SingularSystem { .. } | SolverError::NonPhysical { .. }
        )
    }
}
