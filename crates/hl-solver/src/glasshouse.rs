//! Three-node glasshouse (sunspace) energy balance.
//!
//! Nodes: interior air `T_i`, glazing `T_g`, absorber/collector `T_c`;
//! outdoor `T_e` is fixed. Longwave exchange between node pairs is
//! linearised each iteration with `hr = ε·σ·(T1² + T2²)(T1 + T2)`, the 3×3
//! system is re-solved, and the result under-relaxed until the largest
//! change drops below tolerance.
//!
//! Every coefficient is scaled by the area it acts over so each balance is
//! in watts: glazing terms by the glass area, collector terms and the
//! opaque back wall behind the collector by the collector area.

use hl_core::units::constants::STEFAN_BOLTZMANN;
use hl_core::{
    celsius_to_kelvin, ensure_finite, ensure_non_negative, ensure_positive, ensure_unit_interval,
    kelvin_to_celsius,
};
use nalgebra::{DMatrix, DVector, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::linear::solve_linear_system;
use crate::relax::{IterationState, RelaxConfig, relaxed_fixed_point};

/// Linearised radiative coefficient `ε·σ·(T1² + T2²)(T1 + T2)` (W/m²·K).
///
/// Temperatures in kelvin.
pub fn radiative_coefficient(emissivity: f64, t1: f64, t2: f64) -> f64 {
    emissivity * STEFAN_BOLTZMANN * (t1 * t1 + t2 * t2) * (t1 + t2)
}

/// Glasshouse geometry, optical properties and film coefficients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlasshouseParams {
    /// Outdoor temperature (°C)
    pub outdoor_temp: f64,
    /// Solar irradiance on the glazing (W/m²)
    pub solar_irradiance: f64,
    /// Glazing area (m²)
    pub glass_area: f64,
    /// Absorber/collector area (m²)
    pub collector_area: f64,
    pub glass_transmittance: f64,
    pub glass_absorptance: f64,
    pub collector_absorptance: f64,
    pub emissivity_glass: f64,
    pub emissivity_collector: f64,
    pub emissivity_interior: f64,
    /// External film coefficient on the glazing (W/m²·K)
    pub h_conv_ext: f64,
    /// Internal film coefficient glazing–interior air (W/m²·K)
    pub h_conv_int: f64,
    /// U-value of the opaque back wall (W/m²·K)
    pub u_back: f64,
}

impl Default for GlasshouseParams {
    fn default() -> Self {
        Self {
            outdoor_temp: 0.0,
            solar_irradiance: 0.0,
            glass_area: 20.0,
            collector_area: 16.0,
            glass_transmittance: 0.85,
            glass_absorptance: 0.05,
            collector_absorptance: 0.90,
            emissivity_glass: 0.90,
            emissivity_collector: 0.85,
            emissivity_interior: 0.90,
            h_conv_ext: 15.0,
            h_conv_int: 5.0,
            u_back: 0.5,
        }
    }
}

impl GlasshouseParams {
    pub fn new(outdoor_temp: f64, solar_irradiance: f64, glass_area: f64, collector_area: f64) -> Self {
        Self {
            outdoor_temp,
            solar_irradiance,
            glass_area,
            collector_area,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SolverResult<()> {
        ensure_finite(self.outdoor_temp, "outdoor temperature")?;
        hl_core::ensure_kelvin(celsius_to_kelvin(self.outdoor_temp), "outdoor temperature")?;
        ensure_non_negative(self.solar_irradiance, "solar irradiance")?;
        ensure_positive(self.glass_area, "glass area")?;
        ensure_positive(self.collector_area, "collector area")?;
        ensure_unit_interval(self.glass_transmittance, "glass transmittance")?;
        ensure_unit_interval(self.glass_absorptance, "glass absorptance")?;
        ensure_unit_interval(self.collector_absorptance, "collector absorptance")?;
        ensure_unit_interval(self.emissivity_glass, "glass emissivity")?;
        ensure_unit_interval(self.emissivity_collector, "collector emissivity")?;
        ensure_unit_interval(self.emissivity_interior, "interior emissivity")?;
        ensure_non_negative(self.h_conv_ext, "external convection coefficient")?;
        ensure_non_negative(self.h_conv_int, "internal convection coefficient")?;
        ensure_non_negative(self.u_back, "back wall U-value")?;
        if self.glass_transmittance + self.glass_absorptance > 1.0 {
            return Err(hl_core::HlError::InvalidParameter {
                what: "glass transmittance + absorptance",
                value: self.glass_transmittance + self.glass_absorptance,
                reason: "must not exceed 1",
            }
            .into());
        }
        Ok(())
    }

    /// Solar power absorbed in the glazing (W).
    pub fn glass_solar_gain(&self) -> f64 {
        self.glass_absorptance * self.solar_irradiance * self.glass_area
    }

    /// Transmitted solar power absorbed by the collector (W).
    pub fn collector_solar_gain(&self) -> f64 {
        self.collector_absorptance * self.glass_transmittance * self.solar_irradiance * self.collector_area
    }

    /// Starting iterate `[T_i, T_g, T_c]` in kelvin.
    pub fn initial_guess(&self) -> Vector3<f64> {
        let t_e = celsius_to_kelvin(self.outdoor_temp);
        Vector3::new(t_e + 10.0, t_e + 5.0, t_e + 15.0)
    }

    /// Assemble the linearised balance around `[T_i, T_g, T_c]` (K).
    pub fn assemble(&self, t: &DVector<f64>) -> (DMatrix<f64>, DVector<f64>) {
        let (t_i, t_g, t_c) = (t[0], t[1], t[2]);
        let t_e = celsius_to_kelvin(self.outdoor_temp);
        let a_g = self.glass_area;
        let a_c = self.collector_area;

        let r_gc = radiative_coefficient(self.emissivity_glass * self.emissivity_collector, t_g, t_c) * a_c;
        let r_gi = radiative_coefficient(self.emissivity_glass * self.emissivity_interior, t_g, t_i) * a_g;
        let r_ci = radiative_coefficient(self.emissivity_collector * self.emissivity_interior, t_c, t_i) * a_c;
        let h_int = self.h_conv_int * a_g;
        let h_ext = self.h_conv_ext * a_g;
        let u_b = self.u_back * a_c;

        #[rustfmt::skip]
        let a = DMatrix::from_row_slice(3, 3, &[
            // interior: convection from glazing + radiation from collector = back-wall loss
            h_int + r_ci + u_b, -h_int,              -r_ci,
            // glazing: solar + outdoor convection + radiation with interior and collector = 0
            -r_gi,              h_ext + r_gi + r_gc, -r_gc,
            // collector: absorbed solar = radiation to glazing and interior
            -r_ci,              -r_gc,               r_gc + r_ci,
        ]);
        let b = DVector::from_column_slice(&[
            u_b * t_e,
            self.glass_solar_gain() + h_ext * t_e,
            self.collector_solar_gain(),
        ]);
        (a, b)
    }
}

/// Solved glasshouse temperatures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlasshouseSolution {
    /// Interior air temperature (°C)
    pub interior_temp: f64,
    /// Glazing temperature (°C)
    pub glass_temp: f64,
    /// Collector temperature (°C)
    pub collector_temp: f64,
    /// Update evaluations used; equals the cap when not converged
    pub iterations: usize,
    pub state: IterationState,
    /// Largest temperature change (K) per iteration
    pub max_change_history: Vec<f64>,
    /// Why the iteration stopped early, when it aborted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
}

impl GlasshouseSolution {
    /// True only when the tolerance was met; an aborted or capped run
    /// returns its last iterate with this set to false.
    pub fn converged(&self) -> bool {
        self.state == IterationState::Converged
    }
}

/// Solve the glasshouse energy balance.
///
/// Errors only on invalid parameters. A singular linearised system or a
/// non-physical iterate ends the iteration in [`IterationState::Aborted`]
/// with the last stable temperatures; running out of iterations leaves the
/// state at [`IterationState::Iterating`] with `iterations == max_iterations`.
pub fn solve_glasshouse_temperatures(
    params: &GlasshouseParams,
    config: &RelaxConfig,
) -> SolverResult<GlasshouseSolution> {
    params.validate()?;

    let x0 = DVector::from_iterator(3, params.initial_guess().iter().copied());
    let update = |t: &DVector<f64>| -> SolverResult<DVector<f64>> {
        let (a, b) = params.assemble(t);
        let solved = solve_linear_system(&a, &b)?;
        if let Some(bad) = solved.iter().find(|v| **v <= 0.0) {
            return Err(SolverError::NonPhysical {
                what: format!("glasshouse iterate at {bad} K"),
            });
        }
        Ok(solved)
    };

    let outcome = relaxed_fixed_point(x0, update, config)?;
    debug!(
        iterations = outcome.iterations,
        state = ?outcome.state,
        "glasshouse balance finished"
    );

    Ok(GlasshouseSolution {
        interior_temp: kelvin_to_celsius(outcome.x[0]),
        glass_temp: kelvin_to_celsius(outcome.x[1]),
        collector_temp: kelvin_to_celsius(outcome.x[2]),
        iterations: outcome.iterations,
        state: outcome.state,
        max_change_history: outcome.history,
        abort_reason: outcome.abort_reason.map(|e| e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radiative_coefficient_matches_fourth_power_difference() {
        let (t1, t2) = (320.0, 290.0);
        let hr = radiative_coefficient(0.8, t1, t2);
        let exact = 0.8 * STEFAN_BOLTZMANN * (t1.powi(4) - t2.powi(4));
        assert!((hr * (t1 - t2) - exact).abs() < 1e-9);
    }

    #[test]
    fn default_params_validate() {
        GlasshouseParams::default().validate().unwrap();
    }

    #[test]
    fn invalid_params_rejected_before_iterating() {
        let bad_area = GlasshouseParams::new(0.0, 500.0, 0.0, 16.0);
        assert!(matches!(
            solve_glasshouse_temperatures(&bad_area, &RelaxConfig::default()),
            Err(SolverError::InvalidParameter(_))
        ));

        let bad_eps = GlasshouseParams {
            emissivity_glass: 1.3,
            ..GlasshouseParams::new(0.0, 500.0, 20.0, 16.0)
        };
        assert!(solve_glasshouse_temperatures(&bad_eps, &RelaxConfig::default()).is_err());

        let too_cold = GlasshouseParams::new(-300.0, 500.0, 20.0, 16.0);
        assert!(solve_glasshouse_temperatures(&too_cold, &RelaxConfig::default()).is_err());
    }

    #[test]
    fn no_sun_settles_at_outdoor_temperature() {
        let params = GlasshouseParams::new(5.0, 0.0, 20.0, 16.0);
        let sol = solve_glasshouse_temperatures(&params, &RelaxConfig::default()).unwrap();
        assert!(sol.converged());
        for t in [sol.interior_temp, sol.glass_temp, sol.collector_temp] {
            assert!((t - 5.0).abs() < 0.05, "temperature {t}");
        }
    }

    #[test]
    fn iteration_cap_is_soft() {
        let params = GlasshouseParams::new(0.0, 500.0, 20.0, 16.0);
        let config = RelaxConfig {
            max_iterations: 3,
            ..RelaxConfig::default()
        };
        let sol = solve_glasshouse_temperatures(&params, &config).unwrap();
        assert!(!sol.converged());
        assert_eq!(sol.state, IterationState::Iterating);
        assert_eq!(sol.iterations, 3);
    }

    #[test]
    fn degenerate_coupling_aborts_with_initial_guess() {
        // No film coefficients, no back loss and black-free surfaces: nothing
        // couples the nodes, so the first linearised system is singular.
        let params = GlasshouseParams {
            emissivity_glass: 0.0,
            emissivity_collector: 0.0,
            emissivity_interior: 0.0,
            h_conv_ext: 0.0,
            h_conv_int: 0.0,
            u_back: 0.0,
            ..GlasshouseParams::new(10.0, 300.0, 20.0, 16.0)
        };
        let sol = solve_glasshouse_temperatures(&params, &RelaxConfig::default()).unwrap();
        assert_eq!(sol.state, IterationState::Aborted);
        assert!(!sol.converged());
        assert_eq!(sol.iterations, 1);
        assert!(sol.abort_reason.is_some());
        assert!((sol.interior_temp - 20.0).abs() < 1e-9);
        assert!((sol.glass_temp - 15.0).abs() < 1e-9);
        assert!((sol.collector_temp - 25.0).abs() < 1e-9);
    }
}
