//! Simulation driver and result recording.

use hl_core::{ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::integrator::{BackwardEuler, ForwardEuler, Integrator};
use crate::model::{Forcing, RcModel};

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// Forward Euler; cheap, stable only for `dt` well below `R·C`.
    Explicit,
    /// Backward Euler (default, unconditionally stable).
    #[default]
    Implicit,
}

impl IntegratorType {
    pub fn from_implicit_flag(use_implicit: bool) -> Self {
        if use_implicit {
            IntegratorType::Implicit
        } else {
            IntegratorType::Explicit
        }
    }
}

/// Ordered per-step forcing at a fixed timestep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForcingSeries {
    /// Timestep (s)
    pub dt: f64,
    pub steps: Vec<Forcing>,
}

impl ForcingSeries {
    pub fn new(dt: f64, steps: Vec<Forcing>) -> SimResult<Self> {
        let series = Self { dt, steps };
        series.validate()?;
        Ok(series)
    }

    /// Build from parallel columns, which must all have the same length.
    pub fn from_columns(
        outdoor_temps: &[f64],
        solar_gains: &[f64],
        heating_inputs: &[f64],
        dt: f64,
    ) -> SimResult<Self> {
        let n = outdoor_temps.len();
        if solar_gains.len() != n || heating_inputs.len() != n {
            return Err(SimError::InvalidArg {
                what: format!(
                    "forcing columns differ in length: outdoor {}, solar {}, heating {}",
                    n,
                    solar_gains.len(),
                    heating_inputs.len()
                ),
            });
        }
        let steps = outdoor_temps
            .iter()
            .zip(solar_gains)
            .zip(heating_inputs)
            .map(|((&t_out, &solar), &heat)| Forcing::new(t_out, solar, heat))
            .collect();
        Self::new(dt, steps)
    }

    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.dt, "timestep")?;
        for f in &self.steps {
            ensure_finite(f.outdoor_temp, "outdoor temperature")?;
            ensure_finite(f.solar_gain, "solar gain")?;
            ensure_finite(f.heating, "heating input")?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Simulated span (s).
    pub fn duration(&self) -> f64 {
        self.dt * self.steps.len() as f64
    }
}

/// Record of a transient run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransientRecord {
    /// Timestep (s)
    pub dt: f64,
    /// Heat capacity of the simulated zone (J/K)
    pub capacity: f64,
    /// Zone temperature (°C): the initial value plus one per step
    pub temperatures: Vec<f64>,
    /// Heating load (W) per step, evaluated at the temperature entering the step
    pub heating_loads: Vec<f64>,
}

impl TransientRecord {
    pub fn final_temperature(&self) -> f64 {
        self.temperatures.last().copied().unwrap_or(f64::NAN)
    }

    /// Sensible heat stored over the run, `C·(T_final − T_initial)` (J).
    pub fn energy_stored(&self) -> f64 {
        match (self.temperatures.first(), self.temperatures.last()) {
            (Some(first), Some(last)) => self.capacity * (last - first),
            _ => 0.0,
        }
    }

    /// Time of each recorded temperature (s).
    pub fn times(&self) -> Vec<f64> {
        (0..self.temperatures.len())
            .map(|i| i as f64 * self.dt)
            .collect()
    }
}

/// Run a transient simulation over `series`.
pub fn run_sim(
    model: &RcModel,
    initial_temp: f64,
    series: &ForcingSeries,
    integrator: IntegratorType,
) -> SimResult<TransientRecord> {
    model.validate()?;
    series.validate()?;
    ensure_finite(initial_temp, "initial temperature")?;

    let mut temperatures = Vec::with_capacity(series.len() + 1);
    let mut heating_loads = Vec::with_capacity(series.len());
    let mut t = initial_temp;
    temperatures.push(t);

    for (k, forcing) in series.steps.iter().enumerate() {
        heating_loads.push(model.heating_load(t, forcing));
        t = match integrator {
            IntegratorType::Explicit => ForwardEuler.step(model, t, forcing, series.dt),
            IntegratorType::Implicit => BackwardEuler.step(model, t, forcing, series.dt),
        };
        if !t.is_finite() {
            return Err(SimError::NonPhysical {
                what: format!("zone temperature diverged at step {}", k + 1),
            });
        }
        temperatures.push(t);
    }

    debug!(
        steps = series.len(),
        ?integrator,
        dt_over_rc = series.dt / model.time_constant(),
        final_temp = t,
        "transient run finished"
    );

    Ok(TransientRecord {
        dt: series.dt,
        capacity: model.capacity,
        temperatures,
        heating_loads,
    })
}

/// Simulate a zone from parallel forcing columns.
///
/// Returns `(temperatures, heating_loads)` with `n + 1` and `n` entries for
/// `n` forcing steps.
#[allow(clippy::too_many_arguments)]
pub fn simulate_transient_response(
    initial_temp: f64,
    outdoor_temps: &[f64],
    solar_gains: &[f64],
    heating_inputs: &[f64],
    resistance: f64,
    capacity: f64,
    dt: f64,
    use_implicit: bool,
) -> SimResult<(Vec<f64>, Vec<f64>)> {
    let model = RcModel::new(resistance, capacity)?;
    let series = ForcingSeries::from_columns(outdoor_temps, solar_gains, heating_inputs, dt)?;
    let record = run_sim(
        &model,
        initial_temp,
        &series,
        IntegratorType::from_implicit_flag(use_implicit),
    )?;
    Ok((record.temperatures, record.heating_loads))
}
