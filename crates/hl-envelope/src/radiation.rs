//! Point formulas for longwave exchange and solar absorption.
//!
//! Temperatures are in °C at this boundary and converted to kelvin
//! internally.

use hl_core::units::constants::{STEFAN_BOLTZMANN, blackbody_power};
use hl_core::{HlError, celsius_to_kelvin, ensure_finite, ensure_non_negative, ensure_unit_interval};
use tracing::debug;

use crate::error::{EnvelopeError, EnvelopeResult};

const FLOOR_MAX_ITERATIONS: usize = 50;
/// Energy-balance residual accepted by [`floor_temperature_from_radiosity`] (W/m²).
const FLOOR_RESIDUAL_TOL: f64 = 0.1;

/// Net longwave exchange `ε·σ·A·(T_s⁴ − T_env⁴)` (W).
pub fn radiative_heat_transfer(area: f64, emissivity: f64, surface_temp: f64, environment_temp: f64) -> f64 {
    let t1 = celsius_to_kelvin(surface_temp);
    let t2 = celsius_to_kelvin(environment_temp);
    emissivity * STEFAN_BOLTZMANN * area * (t1.powi(4) - t2.powi(4))
}

/// Linearised coefficient `4·ε·σ·T_m³` with `T_m` the mean absolute temperature (W/m²·K).
pub fn radiation_coefficient(emissivity: f64, surface_temp: f64, environment_temp: f64) -> f64 {
    let tm = 0.5 * (celsius_to_kelvin(surface_temp) + celsius_to_kelvin(environment_temp));
    4.0 * emissivity * STEFAN_BOLTZMANN * tm.powi(3)
}

/// Rough `(F12, F21)` for two large facing surfaces.
///
/// `F12 = min(1, A2/(A1 + A2))` and `F21` from reciprocity. Both zero when
/// either area is not positive.
pub fn parallel_surface_view_factors(area1: f64, area2: f64) -> (f64, f64) {
    if area1 > 0.0 && area2 > 0.0 {
        let f12 = (area2 / (area1 + area2)).min(1.0);
        (f12, f12 * area1 / area2)
    } else {
        (0.0, 0.0)
    }
}

/// Longwave loss from indoors to the sky through glazing (W).
pub fn longwave_radiation_to_sky(window_area: f64, emissivity: f64, indoor_temp: f64, sky_temp: f64) -> f64 {
    radiative_heat_transfer(window_area, emissivity, indoor_temp, sky_temp)
}

/// Solar power absorbed by a surface (W); `incidence_angle` in radians.
///
/// Irradiance arriving from behind the surface counts as zero.
pub fn solar_radiation_absorbed(area: f64, absorptance: f64, irradiance: f64, incidence_angle: f64) -> f64 {
    area * absorptance * (irradiance * incidence_angle.cos()).max(0.0)
}

/// Floor temperature (°C) that balances radiative exchange, convection to
/// the air and any absorbed radiative sources (W/m²):
///
/// ```text
/// (σ·T⁴ − J)·ε/(1−ε) + h·(T − T_air) = q_src
/// ```
///
/// Solved by Newton iteration from `T = T_air`. A black floor (ε = 1) has no
/// finite surface resistance and the radiative term drops out.
pub fn floor_temperature_from_radiosity(
    radiosity: f64,
    emissivity: f64,
    convective_coeff: f64,
    air_temp: f64,
    radiative_sources: f64,
) -> EnvelopeResult<f64> {
    ensure_non_negative(radiosity, "floor radiosity")?;
    ensure_unit_interval(emissivity, "floor emissivity")?;
    ensure_non_negative(convective_coeff, "convective coefficient")?;
    ensure_finite(air_temp, "air temperature")?;
    ensure_finite(radiative_sources, "radiative sources")?;

    let surface_factor = if emissivity < 1.0 {
        emissivity / (1.0 - emissivity)
    } else {
        0.0
    };
    if surface_factor == 0.0 && convective_coeff == 0.0 {
        return Err(HlError::InvalidArg {
            what: "floor balance does not depend on floor temperature",
        }
        .into());
    }

    let mut t = air_temp;
    for iteration in 1..=FLOOR_MAX_ITERATIONS {
        let t_k = celsius_to_kelvin(t);
        let q_rad = (blackbody_power(t_k) - radiosity) * surface_factor;
        let residual = q_rad + convective_coeff * (t - air_temp) - radiative_sources;
        if residual.abs() < FLOOR_RESIDUAL_TOL {
            debug!(iteration, floor_temp = t, "floor balance converged");
            return Ok(t);
        }
        let slope = 4.0 * STEFAN_BOLTZMANN * t_k.powi(3) * surface_factor + convective_coeff;
        t -= residual / slope;
    }

    Err(EnvelopeError::NoConvergence {
        what: format!("floor temperature after {FLOOR_MAX_ITERATIONS} iterations"),
    })
}
