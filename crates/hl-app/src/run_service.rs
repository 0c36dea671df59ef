//! Project execution service.
//!
//! Every case in a project is compiled into solver inputs and run; the
//! results are gathered into a [`ProjectReport`] that serialises to YAML or
//! JSON for the CLI.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use hl_envelope::{
    BuildingEnvelope, DesignSweep, GlasshouseDesign, HeatLossBreakdown, glasshouse_heating_load,
    optimize_glasshouse_design, passive_solar_gain,
};
use hl_project::schema::{
    DesignCaseDef, GlasshouseCaseDef, NetworkCaseDef, Project, RadiationCaseDef,
};
use hl_sim::{IntegratorType, simulate_multiple_scenarios};
use hl_solver::{
    GlasshouseParams, GlasshouseSolution, RelaxConfig, SurfaceExchange,
    solve_glasshouse_temperatures,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::compile;
use crate::error::{AppError, AppResult};

/// Output encoding for [`render_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for ReportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            "json" => Ok(ReportFormat::Json),
            other => Err(AppError::Serialization(format!(
                "unknown report format '{other}' (expected yaml or json)"
            ))),
        }
    }
}

/// Steady heat balance of the project's building envelope.
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeReport {
    /// Outdoor temperature the losses are evaluated at (°C)
    pub design_outdoor_temp: f64,
    pub heat_loss: HeatLossBreakdown,
    /// ΣA·U (W/K)
    pub total_conductance: f64,
    /// 1/ΣA·U (K/W)
    pub thermal_resistance: f64,
    /// Lumped heat capacity (J/K)
    pub thermal_capacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlasshouseReport {
    pub id: String,
    pub solution: GlasshouseSolution,
    /// Solar power admitted by glazing and collector (W)
    pub passive_gain: f64,
    /// Heating needed to reach the case setpoint (W), when one is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heating_load: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DesignReport {
    pub id: String,
    /// Load the design was sized against (W)
    pub building_load: f64,
    pub design: GlasshouseDesign,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadiationReport {
    pub id: String,
    pub surfaces: BTreeMap<String, SurfaceExchange>,
    /// Largest `|A_i·F_ij − A_j·F_ji|` over the view factors used (m²)
    pub reciprocity_error: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub id: String,
    /// Zone temperatures (°C)
    pub temperatures: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransientReport {
    pub id: String,
    pub integrator: IntegratorType,
    /// K/W
    pub resistance: f64,
    /// J/K
    pub capacity: f64,
    /// R·C (s)
    pub time_constant: f64,
    pub dt: f64,
    /// Simulated span (s)
    pub duration: f64,
    pub temperatures: Vec<f64>,
    pub heating_loads: Vec<f64>,
    pub final_temperature: f64,
    /// J
    pub energy_stored: f64,
}

/// Results of every case in a project, in declaration order per kind.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envelope: Option<EnvelopeReport>,
    pub glasshouses: Vec<GlasshouseReport>,
    pub designs: Vec<DesignReport>,
    pub radiation: Vec<RadiationReport>,
    pub networks: Vec<NetworkReport>,
    pub transients: Vec<TransientReport>,
    /// Wall-clock time spent running the project (s)
    pub elapsed_s: f64,
}

/// Validate and run every case in `project`.
///
/// Stops at the first failing case; the error names the case id.
pub fn run_project(project: &Project) -> AppResult<ProjectReport> {
    let started = Instant::now();
    hl_project::validate_project(project)?;

    let envelope = project
        .envelope
        .as_ref()
        .map(compile::building_envelope)
        .transpose()?;
    let envelope_report = match (&envelope, &project.envelope) {
        (Some(env), Some(def)) => Some(envelope_report(env, def.design_outdoor_temp)?),
        _ => None,
    };

    let glasshouses = project
        .glasshouses
        .iter()
        .map(|case| run_glasshouse_case(case).map_err(|e| e.in_case(&case.id)))
        .collect::<AppResult<Vec<_>>>()?;

    let designs = project
        .designs
        .iter()
        .map(|case| run_design_case(case, envelope.as_ref()).map_err(|e| e.in_case(&case.id)))
        .collect::<AppResult<Vec<_>>>()?;

    let radiation = project
        .radiation
        .iter()
        .map(|case| run_radiation_case(case).map_err(|e| e.in_case(&case.id)))
        .collect::<AppResult<Vec<_>>>()?;

    let networks = project
        .networks
        .iter()
        .map(|case| run_network_case(case).map_err(|e| e.in_case(&case.id)))
        .collect::<AppResult<Vec<_>>>()?;

    let transients = run_transient_cases(project, envelope.as_ref())?;

    let elapsed_s = started.elapsed().as_secs_f64();
    info!(
        project = %project.name,
        glasshouses = glasshouses.len(),
        designs = designs.len(),
        radiation = radiation.len(),
        networks = networks.len(),
        transients = transients.len(),
        elapsed_s,
        "project run complete"
    );

    Ok(ProjectReport {
        name: project.name.clone(),
        envelope: envelope_report,
        glasshouses,
        designs,
        radiation,
        networks,
        transients,
        elapsed_s,
    })
}

/// Solve a single glasshouse with default properties and iteration settings.
pub fn run_glasshouse(
    outdoor_temp: f64,
    solar_irradiance: f64,
    glass_area: f64,
    collector_area: f64,
) -> AppResult<GlasshouseReport> {
    let params = GlasshouseParams::new(outdoor_temp, solar_irradiance, glass_area, collector_area);
    glasshouse_report("glasshouse", &params, &RelaxConfig::default(), None)
}

/// Serialise a report in the requested format.
pub fn render_report(report: &ProjectReport, format: ReportFormat) -> AppResult<String> {
    match format {
        ReportFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| AppError::Serialization(e.to_string()))
        }
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).map_err(|e| AppError::Serialization(e.to_string()))
        }
    }
}

/// Write rendered output to `path`.
pub fn write_report(path: &Path, contents: &str) -> AppResult<()> {
    std::fs::write(path, contents).map_err(|source| AppError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn envelope_report(envelope: &BuildingEnvelope, outdoor_temp: f64) -> AppResult<EnvelopeReport> {
    let (thermal_resistance, thermal_capacity) = compile::envelope_rc(envelope)?;
    Ok(EnvelopeReport {
        design_outdoor_temp: outdoor_temp,
        heat_loss: envelope.heat_loss(outdoor_temp),
        total_conductance: envelope.total_conductance(),
        thermal_resistance,
        thermal_capacity,
    })
}

fn glasshouse_report(
    id: &str,
    params: &GlasshouseParams,
    config: &RelaxConfig,
    setpoint: Option<f64>,
) -> AppResult<GlasshouseReport> {
    let solution = solve_glasshouse_temperatures(params, config)?;
    if !solution.converged() {
        warn!(
            case = id,
            state = ?solution.state,
            iterations = solution.iterations,
            "glasshouse balance did not converge"
        );
    }

    let passive_gain = passive_solar_gain(
        params.glass_area,
        params.glass_transmittance,
        params.solar_irradiance,
        params.collector_area,
        params.collector_absorptance,
    );
    let heating_load = setpoint.map(|t_set| {
        glasshouse_heating_load(
            solution.interior_temp,
            params.outdoor_temp,
            t_set,
            params.glass_area,
            params.u_back,
        )
    });

    Ok(GlasshouseReport {
        id: id.to_string(),
        solution,
        passive_gain,
        heating_load,
    })
}

fn run_glasshouse_case(case: &GlasshouseCaseDef) -> AppResult<GlasshouseReport> {
    let (params, config) = compile::glasshouse_inputs(case);
    glasshouse_report(&case.id, &params, &config, case.heating_setpoint)
}

fn run_design_case(
    case: &DesignCaseDef,
    envelope: Option<&BuildingEnvelope>,
) -> AppResult<DesignReport> {
    let building_load = match (case.building_load, envelope) {
        (Some(load), _) => load,
        (None, Some(env)) => env.heat_loss(case.outdoor_temp).total_loss,
        (None, None) => {
            return Err(AppError::Validation(
                "design needs a building load or an envelope".to_string(),
            ));
        }
    };
    let sweep = DesignSweep {
        min_glass_area: case.min_glass_area,
        max_glass_area: case.max_glass_area,
        steps: case.steps,
    };
    let design = optimize_glasshouse_design(
        case.outdoor_temp,
        case.solar_irradiance,
        building_load,
        &sweep,
    )?;
    Ok(DesignReport {
        id: case.id.clone(),
        building_load,
        design,
    })
}

fn run_radiation_case(case: &RadiationCaseDef) -> AppResult<RadiationReport> {
    let system = compile::radiation_system(case)?;
    let exchanges = system.solve()?;
    let reciprocity_error = system.view_factors.reciprocity_error(&system.surfaces);
    let surfaces = system
        .surfaces
        .iter()
        .map(|s| s.name.clone())
        .zip(exchanges)
        .collect();
    Ok(RadiationReport {
        id: case.id.clone(),
        surfaces,
        reciprocity_error,
    })
}

fn run_network_case(case: &NetworkCaseDef) -> AppResult<NetworkReport> {
    let network = compile::thermal_network(case)?;
    Ok(NetworkReport {
        id: case.id.clone(),
        temperatures: network.solve()?,
    })
}

fn run_transient_cases(
    project: &Project,
    envelope: Option<&BuildingEnvelope>,
) -> AppResult<Vec<TransientReport>> {
    let scenarios = project
        .transients
        .iter()
        .map(|case| compile::transient_scenario(case, envelope).map_err(|e| e.in_case(&case.id)))
        .collect::<AppResult<Vec<_>>>()?;

    simulate_multiple_scenarios(&scenarios)
        .into_iter()
        .zip(&scenarios)
        .map(|(outcome, scenario)| {
            let record = outcome
                .result
                .map_err(|e| AppError::from(e).in_case(&outcome.name))?;
            Ok(TransientReport {
                id: outcome.name,
                integrator: scenario.integrator,
                resistance: scenario.model.resistance,
                capacity: scenario.model.capacity,
                time_constant: scenario.model.time_constant(),
                dt: record.dt,
                duration: scenario.forcing.duration(),
                final_temperature: record.final_temperature(),
                energy_stored: record.energy_stored(),
                temperatures: record.temperatures,
                heating_loads: record.heating_loads,
            })
        })
        .collect()
}
