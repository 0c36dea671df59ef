//! Passive-solar glasshouse helpers and a design sweep over glazing area.

use hl_core::{HlError, ensure_finite, ensure_non_negative, ensure_positive};
use hl_solver::{GlasshouseParams, RelaxConfig, solve_glasshouse_temperatures};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::EnvelopeResult;

/// Collector area as a fraction of glazing area in the design sweep.
pub const COLLECTOR_TO_GLASS_RATIO: f64 = 0.8;
/// Share of the building load the passive gain must reach for a design to qualify.
pub const LOAD_COVERAGE_THRESHOLD: f64 = 0.9;

/// Heating power needed to hold the glasshouse at `setpoint` (W).
///
/// Zero when the passive interior temperature already meets the setpoint;
/// otherwise the back-wall loss at the setpoint, `U·A·(T_set − T_out)`.
pub fn glasshouse_heating_load(
    interior_temp: f64,
    outdoor_temp: f64,
    setpoint: f64,
    glass_area: f64,
    u_back: f64,
) -> f64 {
    if interior_temp < setpoint {
        u_back * glass_area * (setpoint - outdoor_temp)
    } else {
        0.0
    }
}

/// Solar power admitted by the glazing plus that absorbed by the collector (W).
pub fn passive_solar_gain(
    glass_area: f64,
    glass_transmittance: f64,
    solar_irradiance: f64,
    collector_area: f64,
    collector_absorptance: f64,
) -> f64 {
    let direct = glass_transmittance * solar_irradiance * glass_area;
    let collector = collector_absorptance * glass_transmittance * solar_irradiance * collector_area;
    direct + collector
}

/// Glazing-area range and resolution for [`optimize_glasshouse_design`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSweep {
    /// Smallest glazing area tried (m²)
    pub min_glass_area: f64,
    /// Largest glazing area tried (m²)
    pub max_glass_area: f64,
    /// Number of intervals; `steps + 1` candidates are evaluated
    pub steps: usize,
}

impl Default for DesignSweep {
    fn default() -> Self {
        Self {
            min_glass_area: 10.0,
            max_glass_area: 100.0,
            steps: 20,
        }
    }
}

impl DesignSweep {
    pub fn validate(&self) -> EnvelopeResult<()> {
        ensure_positive(self.min_glass_area, "minimum glass area")?;
        ensure_positive(self.max_glass_area, "maximum glass area")?;
        if self.max_glass_area < self.min_glass_area {
            return Err(HlError::InvalidParameter {
                what: "maximum glass area",
                value: self.max_glass_area,
                reason: "must not be below the minimum",
            }
            .into());
        }
        if self.steps == 0 {
            return Err(HlError::InvalidArg {
                what: "design sweep needs at least one step",
            }
            .into());
        }
        Ok(())
    }

    /// Candidate glazing areas, smallest first.
    pub fn glass_areas(&self) -> Vec<f64> {
        let step = (self.max_glass_area - self.min_glass_area) / self.steps as f64;
        (0..=self.steps)
            .map(|i| self.min_glass_area + i as f64 * step)
            .collect()
    }
}

/// One evaluated glasshouse design.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlasshouseDesign {
    pub glass_area: f64,
    pub collector_area: f64,
    /// Passive interior temperature (°C)
    pub interior_temp: f64,
    /// Passive solar gain (W)
    pub passive_gain: f64,
    /// Passive gain over building load; zero for a zero load
    pub efficiency: f64,
    /// Whether the gain reaches the coverage threshold
    pub meets_load: bool,
    /// Whether the interior temperature comes from a converged balance
    pub converged: bool,
}

fn evaluate_design(
    glass_area: f64,
    outdoor_temp: f64,
    solar_irradiance: f64,
    building_load: f64,
) -> EnvelopeResult<GlasshouseDesign> {
    let collector_area = glass_area * COLLECTOR_TO_GLASS_RATIO;
    let params = GlasshouseParams::new(outdoor_temp, solar_irradiance, glass_area, collector_area);
    let solution = solve_glasshouse_temperatures(&params, &RelaxConfig::default())?;

    let passive_gain = passive_solar_gain(
        glass_area,
        params.glass_transmittance,
        solar_irradiance,
        collector_area,
        params.collector_absorptance,
    );
    let efficiency = if building_load > 0.0 {
        passive_gain / building_load
    } else {
        0.0
    };

    Ok(GlasshouseDesign {
        glass_area,
        collector_area,
        interior_temp: solution.interior_temp,
        passive_gain,
        efficiency,
        meets_load: passive_gain >= LOAD_COVERAGE_THRESHOLD * building_load,
        converged: solution.converged(),
    })
}

/// Smallest glazing area whose passive gain covers the building load.
///
/// Candidates are solved in parallel. When none qualifies the largest
/// candidate is returned with `meets_load == false`.
pub fn optimize_glasshouse_design(
    outdoor_temp: f64,
    solar_irradiance: f64,
    building_load: f64,
    sweep: &DesignSweep,
) -> EnvelopeResult<GlasshouseDesign> {
    ensure_finite(outdoor_temp, "outdoor temperature")?;
    ensure_non_negative(solar_irradiance, "solar irradiance")?;
    ensure_non_negative(building_load, "building load")?;
    sweep.validate()?;

    let designs = sweep
        .glass_areas()
        .into_par_iter()
        .map(|area| evaluate_design(area, outdoor_temp, solar_irradiance, building_load))
        .collect::<EnvelopeResult<Vec<_>>>()?;
    debug!(candidates = designs.len(), "glasshouse design sweep evaluated");

    let best = designs
        .iter()
        .filter(|d| d.meets_load)
        .min_by(|a, b| a.glass_area.total_cmp(&b.glass_area))
        .or_else(|| designs.last())
        .cloned()
        .ok_or(HlError::Invariant {
            what: "design sweep produced no candidates",
        })?;

    info!(
        glass_area = best.glass_area,
        meets_load = best.meets_load,
        passive_gain = best.passive_gain,
        "glasshouse design selected"
    );
    Ok(best)
}
