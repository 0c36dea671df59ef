//! Transient simulation for a single lumped thermal zone.
//!
//! Provides:
//! - RC zone model (one resistance to outdoors, one capacitance)
//! - Explicit (forward) and implicit (backward) Euler steppers
//! - Forcing series and the fixed-step driver
//! - Parallel runner for independent scenarios

pub mod error;
pub mod integrator;
pub mod model;
pub mod scenarios;
pub mod sim;

pub use error::{SimError, SimResult};
pub use integrator::{BackwardEuler, ForwardEuler, Integrator, explicit_step, implicit_step};
pub use model::{Forcing, RcModel};
pub use scenarios::{ScenarioOutcome, TransientScenario, simulate_multiple_scenarios};
pub use sim::{
    ForcingSeries, IntegratorType, TransientRecord, run_sim, simulate_transient_response,
};
