//! Conversion from project definitions to solver inputs.

use hl_core::{NameIndex, celsius_to_kelvin};
use hl_envelope::{BuildingEnvelope, EnvelopeElement, MassProperties, estimate_thermal_capacity};
use hl_project::schema::{
    EnvelopeDef, GlasshouseCaseDef, IntegratorDef, NetworkCaseDef, RadiationCaseDef,
    TransientCaseDef,
};
use hl_sim::{Forcing, ForcingSeries, IntegratorType, RcModel, TransientScenario};
use hl_solver::{
    GlasshouseParams, NetworkOptions, RadiationSystem, RelaxConfig, Surface, ThermalNetwork,
    ViewFactors,
};

use crate::error::{AppError, AppResult};

pub fn building_envelope(def: &EnvelopeDef) -> AppResult<BuildingEnvelope> {
    let envelope = BuildingEnvelope {
        walls: EnvelopeElement::new(def.wall_area, def.wall_u_value),
        roof: EnvelopeElement::new(def.roof_area, def.roof_u_value),
        floor: EnvelopeElement::new(def.floor_area, def.floor_u_value),
        windows: EnvelopeElement::new(def.window_area, def.window_u_value),
        shgc: def.shgc,
        air_changes_per_hour: def.ventilation_rate,
        volume: def.building_volume,
        indoor_temp: def.indoor_temp,
    };
    envelope.validate()?;
    Ok(envelope)
}

pub fn glasshouse_inputs(def: &GlasshouseCaseDef) -> (GlasshouseParams, RelaxConfig) {
    let p = &def.properties;
    let params = GlasshouseParams {
        outdoor_temp: def.outdoor_temp,
        solar_irradiance: def.solar_irradiance,
        glass_area: def.glass_area,
        collector_area: def.collector_area,
        glass_transmittance: p.glass_transmittance,
        glass_absorptance: p.glass_absorptance,
        collector_absorptance: p.collector_absorptance,
        emissivity_glass: p.emissivity_glass,
        emissivity_collector: p.emissivity_collector,
        emissivity_interior: p.emissivity_interior,
        h_conv_ext: p.h_conv_ext,
        h_conv_int: p.h_conv_int,
        u_back: p.u_back,
    };
    let config = RelaxConfig {
        max_iterations: def.iteration.max_iterations,
        tolerance: def.iteration.tolerance,
        relaxation: def.iteration.relaxation,
    };
    (params, config)
}

/// Surfaces in declaration order, with explicit view factors when given and
/// area ratios otherwise.
pub fn radiation_system(def: &RadiationCaseDef) -> AppResult<RadiationSystem> {
    let surfaces: Vec<Surface> = def
        .surfaces
        .iter()
        .map(|s| {
            let surface = Surface::new(
                s.name.clone(),
                s.area,
                s.emissivity,
                celsius_to_kelvin(s.temperature.unwrap_or(def.ambient_temp)),
            );
            match s.absorptance {
                Some(a) => surface.with_absorptance(a),
                None => surface,
            }
        })
        .collect();

    let system = if def.view_factors.is_empty() {
        RadiationSystem::with_area_ratio_view_factors(surfaces)?
    } else {
        let index = NameIndex::from_names(def.surfaces.iter().map(|s| s.name.clone()))?;
        let pairs = def
            .view_factors
            .iter()
            .map(|vf| (vf.from.as_str(), vf.to.as_str(), vf.value));
        let view_factors = ViewFactors::from_pairs(&index, pairs)?;
        RadiationSystem::new(surfaces, view_factors)?
    };
    Ok(system)
}

pub fn thermal_network(def: &NetworkCaseDef) -> AppResult<ThermalNetwork> {
    let mut options = NetworkOptions::default();
    if let Some(lambda) = def.boundary_coupling {
        options.boundary_coupling = lambda;
    }
    let mut network = ThermalNetwork::new(def.zones.iter().cloned())?.with_options(options);
    for g in &def.conductances {
        network.set_conductance(&g.a, &g.b, g.value)?;
    }
    for (zone, &t) in &def.boundary_temps {
        network.set_boundary(zone, t)?;
    }
    for (zone, &q) in &def.heat_sources {
        network.set_source(zone, q)?;
    }
    Ok(network)
}

/// Lumped `(R, C)` for a building: `1/ΣAU` and the default envelope mass.
pub fn envelope_rc(envelope: &BuildingEnvelope) -> AppResult<(f64, f64)> {
    let resistance = envelope.estimated_thermal_resistance();
    let capacity = estimate_thermal_capacity(envelope.volume, &MassProperties::default())?;
    Ok((resistance, capacity))
}

pub fn transient_scenario(
    def: &TransientCaseDef,
    envelope: Option<&BuildingEnvelope>,
) -> AppResult<TransientScenario> {
    let missing_envelope = || AppError::Validation(format!("transient '{}' needs an envelope", def.id));

    let (resistance, capacity) = match (def.resistance, def.capacity) {
        (Some(r), Some(c)) => (r, c),
        (r, c) => {
            let (r_env, c_env) = envelope_rc(envelope.ok_or_else(missing_envelope)?)?;
            (r.unwrap_or(r_env), c.unwrap_or(c_env))
        }
    };
    let model = RcModel::new(resistance, capacity)?;

    let f = &def.forcing;
    let n = f.outdoor_temps.len();
    let column = |values: &Vec<f64>, k: usize| if values.is_empty() { 0.0 } else { values[k] };
    let solar = |k: usize| -> AppResult<f64> {
        if f.solar_irradiance.is_empty() {
            Ok(column(&f.solar_gains, k))
        } else {
            let envelope = envelope.ok_or_else(missing_envelope)?;
            Ok(envelope.window_solar_gain(f.solar_irradiance[k]))
        }
    };

    let steps = (0..n)
        .map(|k| -> AppResult<Forcing> {
            Ok(Forcing::new(f.outdoor_temps[k], solar(k)?, column(&f.heating, k)))
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(TransientScenario {
        name: def.id.clone(),
        model,
        initial_temp: def.initial_temp,
        forcing: ForcingSeries::new(def.dt, steps)?,
        integrator: match def.integrator {
            IntegratorDef::Explicit => IntegratorType::Explicit,
            IntegratorDef::Implicit => IntegratorType::Implicit,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_project::schema::{ForcingDef, SurfaceDef, ViewFactorDef};

    fn envelope_def() -> EnvelopeDef {
        EnvelopeDef {
            wall_area: 100.0,
            wall_u_value: 0.3,
            roof_area: 50.0,
            roof_u_value: 0.2,
            floor_area: 50.0,
            floor_u_value: 0.2,
            window_area: 10.0,
            window_u_value: 1.0,
            shgc: 0.5,
            ventilation_rate: 0.5,
            building_volume: 343.0,
            indoor_temp: 20.0,
            design_outdoor_temp: -5.0,
        }
    }

    #[test]
    fn transient_rc_from_envelope() {
        let envelope = building_envelope(&envelope_def()).unwrap();
        let def = TransientCaseDef {
            id: "t".to_string(),
            initial_temp: 20.0,
            dt: 3600.0,
            integrator: IntegratorDef::Implicit,
            resistance: None,
            capacity: None,
            forcing: ForcingDef {
                outdoor_temps: vec![0.0, 0.0],
                solar_irradiance: vec![0.0, 400.0],
                ..Default::default()
            },
        };
        let scenario = transient_scenario(&def, Some(&envelope)).unwrap();

        // ΣAU = 30 + 10 + 10 + 10 W/K; 343 m³ -> 6·49 m² of envelope.
        assert!((scenario.model.resistance - 1.0 / 60.0).abs() < 1e-12);
        let c = 294.0 * 0.3 * 1800.0 * 1000.0;
        assert!((scenario.model.capacity - c).abs() / c < 1e-9);
        assert!((scenario.forcing.steps[1].solar_gain - 2000.0).abs() < 1e-9);
        assert_eq!(scenario.forcing.steps[0].heating, 0.0);

        assert!(transient_scenario(&def, None).is_err());
    }

    #[test]
    fn explicit_view_factors_are_used() {
        let def = RadiationCaseDef {
            id: "r".to_string(),
            ambient_temp: 20.0,
            surfaces: vec![
                SurfaceDef {
                    name: "a".to_string(),
                    area: 1.0,
                    emissivity: 0.8,
                    absorptance: Some(0.6),
                    temperature: Some(40.0),
                },
                SurfaceDef {
                    name: "b".to_string(),
                    area: 1.0,
                    emissivity: 0.8,
                    absorptance: None,
                    temperature: None,
                },
            ],
            view_factors: vec![
                ViewFactorDef {
                    from: "a".to_string(),
                    to: "b".to_string(),
                    value: 1.0,
                },
                ViewFactorDef {
                    from: "b".to_string(),
                    to: "a".to_string(),
                    value: 1.0,
                },
            ],
        };
        let system = radiation_system(&def).unwrap();
        assert_eq!(system.view_factors.get(0, 1), 1.0);
        assert!((system.surfaces[1].temperature - celsius_to_kelvin(20.0)).abs() < 1e-12);
        assert_eq!(system.surfaces[0].absorptance, Some(0.6));
    }
}
