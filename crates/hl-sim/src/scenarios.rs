//! Independent transient scenarios run in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SimResult;
use crate::model::RcModel;
use crate::sim::{ForcingSeries, IntegratorType, TransientRecord, run_sim};

/// One zone, one forcing series, one integrator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransientScenario {
    pub name: String,
    pub model: RcModel,
    /// Starting zone temperature (°C)
    pub initial_temp: f64,
    pub forcing: ForcingSeries,
    #[serde(default)]
    pub integrator: IntegratorType,
}

impl TransientScenario {
    pub fn run(&self) -> SimResult<TransientRecord> {
        run_sim(&self.model, self.initial_temp, &self.forcing, self.integrator)
    }
}

/// Result of one scenario, kept next to its name.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: SimResult<TransientRecord>,
}

/// Run every scenario on the rayon pool.
///
/// Scenarios share nothing; a failing scenario does not affect the others.
/// Outcomes come back in input order.
pub fn simulate_multiple_scenarios(scenarios: &[TransientScenario]) -> Vec<ScenarioOutcome> {
    let outcomes: Vec<ScenarioOutcome> = scenarios
        .par_iter()
        .map(|scenario| ScenarioOutcome {
            name: scenario.name.clone(),
            result: scenario.run(),
        })
        .collect();

    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            warn!(scenario = %outcome.name, error = %e, "transient scenario failed");
        }
    }
    info!(
        scenarios = outcomes.len(),
        failed = outcomes.iter().filter(|o| o.result.is_err()).count(),
        "transient scenarios finished"
    );
    outcomes
}
