//! Application service layer for heatload.
//!
//! Turns a project document into solver inputs, runs every case and
//! collects a serialisable report for the CLI.

pub mod compile;
pub mod error;
pub mod project_service;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use project_service::{CaseSummary, list_cases, load_project, save_project, validate_project};
pub use run_service::{
    DesignReport, EnvelopeReport, GlasshouseReport, NetworkReport, ProjectReport, RadiationReport,
    ReportFormat, TransientReport, render_report, run_glasshouse, run_project, write_report,
};
