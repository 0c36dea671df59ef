//! Error types for the hl-app service layer.

use std::path::PathBuf;

/// Application error wrapping the backend crates' errors for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to write {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Case '{id}' failed: {message}")]
    Case { id: String, message: String },

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Envelope error: {0}")]
    Envelope(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for hl-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Attach the id of the case being processed.
    pub fn in_case(self, id: &str) -> Self {
        match self {
            AppError::Case { .. } => self,
            other => AppError::Case {
                id: id.to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<hl_project::ProjectError> for AppError {
    fn from(err: hl_project::ProjectError) -> Self {
        match err {
            hl_project::ProjectError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<hl_project::ValidationError> for AppError {
    fn from(err: hl_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<hl_solver::SolverError> for AppError {
    fn from(err: hl_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<hl_sim::SimError> for AppError {
    fn from(err: hl_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<hl_envelope::EnvelopeError> for AppError {
    fn from(err: hl_envelope::EnvelopeError) -> Self {
        AppError::Envelope(err.to_string())
    }
}

impl From<hl_core::HlError> for AppError {
    fn from(err: hl_core::HlError) -> Self {
        AppError::Solver(err.to_string())
    }
}
