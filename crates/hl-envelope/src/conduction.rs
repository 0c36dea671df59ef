//! Fabric conduction, ventilation loss and lumped RC estimates.

use hl_core::units::constants::{AIR_DENSITY, AIR_SPECIFIC_HEAT};
use hl_core::{Power, ensure_finite, ensure_non_negative, ensure_positive, ensure_unit_interval, w};
use serde::{Deserialize, Serialize};

use crate::error::EnvelopeResult;

/// Internal surface film resistance (m²·K/W).
pub const DEFAULT_R_SI: f64 = 0.13;
/// External surface film resistance (m²·K/W).
pub const DEFAULT_R_SE: f64 = 0.04;

/// Total resistance of a single-layer wall with the default surface films.
pub fn thermal_resistance(thickness: f64, conductivity: f64) -> EnvelopeResult<f64> {
    thermal_resistance_with_films(thickness, conductivity, DEFAULT_R_SI, DEFAULT_R_SE)
}

/// `R_t = R_si + e/λ + R_se` (m²·K/W).
pub fn thermal_resistance_with_films(
    thickness: f64,
    conductivity: f64,
    r_si: f64,
    r_se: f64,
) -> EnvelopeResult<f64> {
    ensure_non_negative(thickness, "layer thickness")?;
    ensure_positive(conductivity, "thermal conductivity")?;
    ensure_non_negative(r_si, "internal film resistance")?;
    ensure_non_negative(r_se, "external film resistance")?;
    Ok(r_si + thickness / conductivity + r_se)
}

pub fn u_value(resistance: f64) -> EnvelopeResult<f64> {
    Ok(1.0 / ensure_positive(resistance, "thermal resistance")?)
}

/// `Q = A·U·(T_in − T_out)` (W).
pub fn conductive_loss(area: f64, u_value: f64, indoor_temp: f64, outdoor_temp: f64) -> f64 {
    area * u_value * (indoor_temp - outdoor_temp)
}

/// Ventilation loss `ṁ·c_p·ΔT` with `ṁ = ρ·V·ACH/3600` (W).
pub fn ventilation_loss(volume: f64, air_changes_per_hour: f64, indoor_temp: f64, outdoor_temp: f64) -> f64 {
    ventilation_conductance(volume, air_changes_per_hour) * (indoor_temp - outdoor_temp)
}

fn ventilation_conductance(volume: f64, air_changes_per_hour: f64) -> f64 {
    AIR_DENSITY * volume * air_changes_per_hour / 3600.0 * AIR_SPECIFIC_HEAT
}

/// One opaque or glazed element of the envelope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeElement {
    /// Area (m²)
    pub area: f64,
    /// U-value (W/m²·K)
    pub u_value: f64,
}

impl EnvelopeElement {
    pub fn new(area: f64, u_value: f64) -> Self {
        Self { area, u_value }
    }

    /// `A·U` (W/K).
    pub fn conductance(&self) -> f64 {
        self.area * self.u_value
    }
}

/// Single-zone building envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingEnvelope {
    pub walls: EnvelopeElement,
    pub roof: EnvelopeElement,
    pub floor: EnvelopeElement,
    pub windows: EnvelopeElement,
    /// Solar heat gain coefficient of the glazing
    #[serde(default)]
    pub shgc: f64,
    /// Air changes per hour
    pub air_changes_per_hour: f64,
    /// Heated volume (m³)
    pub volume: f64,
    /// Indoor set temperature (°C)
    pub indoor_temp: f64,
}

impl BuildingEnvelope {
    pub fn validate(&self) -> EnvelopeResult<()> {
        for (el, area, u) in [
            (&self.walls, "wall area", "wall U-value"),
            (&self.roof, "roof area", "roof U-value"),
            (&self.floor, "floor area", "floor U-value"),
            (&self.windows, "window area", "window U-value"),
        ] {
            ensure_non_negative(el.area, area)?;
            ensure_non_negative(el.u_value, u)?;
        }
        ensure_unit_interval(self.shgc, "solar heat gain coefficient")?;
        ensure_non_negative(self.air_changes_per_hour, "air changes per hour")?;
        ensure_positive(self.volume, "building volume")?;
        ensure_finite(self.indoor_temp, "indoor temperature")?;
        Ok(())
    }

    fn elements(&self) -> [&EnvelopeElement; 4] {
        [&self.walls, &self.roof, &self.floor, &self.windows]
    }

    /// Fabric conductance `Σ A·U` (W/K), ventilation excluded.
    pub fn total_conductance(&self) -> f64 {
        self.elements().iter().map(|e| e.conductance()).sum()
    }

    /// Lumped resistance to outdoors, `1/Σ A·U` (K/W).
    ///
    /// Infinite for a perfectly insulated envelope.
    pub fn estimated_thermal_resistance(&self) -> f64 {
        let g = self.total_conductance();
        if g > 0.0 { 1.0 / g } else { f64::INFINITY }
    }

    /// Solar gain through the glazing for a given irradiance (W).
    pub fn window_solar_gain(&self, irradiance: f64) -> f64 {
        self.windows.area * self.shgc * irradiance.max(0.0)
    }

    /// Steady heat loss at the indoor set temperature.
    pub fn heat_loss(&self, outdoor_temp: f64) -> HeatLossBreakdown {
        self.heat_loss_at(self.indoor_temp, outdoor_temp)
    }

    /// Steady heat loss for an arbitrary indoor temperature.
    pub fn heat_loss_at(&self, indoor_temp: f64, outdoor_temp: f64) -> HeatLossBreakdown {
        let loss = |e: &EnvelopeElement| conductive_loss(e.area, e.u_value, indoor_temp, outdoor_temp);
        let wall_loss = loss(&self.walls);
        let roof_loss = loss(&self.roof);
        let floor_loss = loss(&self.floor);
        let window_loss = loss(&self.windows);
        let conductive_loss = wall_loss + roof_loss + floor_loss + window_loss;
        let ventilation_loss =
            ventilation_loss(self.volume, self.air_changes_per_hour, indoor_temp, outdoor_temp);

        HeatLossBreakdown {
            wall_loss,
            roof_loss,
            floor_loss,
            window_loss,
            conductive_loss,
            ventilation_loss,
            total_loss: conductive_loss + ventilation_loss,
        }
    }
}

/// Heat loss per element (W).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatLossBreakdown {
    pub wall_loss: f64,
    pub roof_loss: f64,
    pub floor_loss: f64,
    pub window_loss: f64,
    pub conductive_loss: f64,
    pub ventilation_loss: f64,
    pub total_loss: f64,
}

impl HeatLossBreakdown {
    pub fn total_power(&self) -> Power {
        w(self.total_loss)
    }
}

/// Thermal mass assumptions for [`estimate_thermal_capacity`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassProperties {
    /// Average envelope thickness (m)
    pub wall_thickness: f64,
    /// Density (kg/m³)
    pub density: f64,
    /// Specific heat (J/kg·K)
    pub specific_heat: f64,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            wall_thickness: 0.3,
            density: 1800.0,
            specific_heat: 1000.0,
        }
    }
}

/// Lumped heat capacity of the envelope (J/K).
///
/// Treats the building as a cube: envelope area `6·V^(2/3)` at the given
/// thickness, density and specific heat.
pub fn estimate_thermal_capacity(volume: f64, mass: &MassProperties) -> EnvelopeResult<f64> {
    ensure_positive(volume, "building volume")?;
    ensure_positive(mass.wall_thickness, "wall thickness")?;
    ensure_positive(mass.density, "density")?;
    ensure_positive(mass.specific_heat, "specific heat")?;
    let surface = 6.0 * volume.powf(2.0 / 3.0);
    Ok(surface * mass.wall_thickness * mass.density * mass.specific_heat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::power::kilowatt;

    fn test_house() -> BuildingEnvelope {
        BuildingEnvelope {
            walls: EnvelopeElement::new(120.0, 0.3),
            roof: EnvelopeElement::new(80.0, 0.2),
            floor: EnvelopeElement::new(80.0, 0.25),
            windows: EnvelopeElement::new(20.0, 1.4),
            shgc: 0.6,
            air_changes_per_hour: 0.5,
            volume: 400.0,
            indoor_temp: 20.0,
        }
    }

    #[test]
    fn resistance_includes_surface_films() {
        let r = thermal_resistance(0.2, 0.04).unwrap();
        assert!((r - (0.13 + 5.0 + 0.04)).abs() < 1e-12);
        assert!((u_value(r).unwrap() - 1.0 / 5.17).abs() < 1e-12);
        assert!(thermal_resistance(0.2, 0.0).is_err());
        assert!(u_value(0.0).is_err());
    }

    #[test]
    fn ventilation_loss_one_air_change() {
        // 1.2 kg/m³ · 300 m³/h / 3600 · 1005 J/kg·K · 10 K
        let q = ventilation_loss(300.0, 1.0, 20.0, 10.0);
        assert!((q - 1005.0).abs() < 1e-9);
    }

    #[test]
    fn breakdown_sums() {
        let b = test_house().heat_loss(0.0);
        assert!((b.wall_loss - 720.0).abs() < 1e-9);
        assert!((b.window_loss - 560.0).abs() < 1e-9);
        let parts = b.wall_loss + b.roof_loss + b.floor_loss + b.window_loss;
        assert!((b.conductive_loss - parts).abs() < 1e-9);
        assert!((b.total_loss - b.conductive_loss - b.ventilation_loss).abs() < 1e-9);
        assert!((b.total_power().get::<kilowatt>() - b.total_loss / 1000.0).abs() < 1e-12);
    }

    #[test]
    fn no_temperature_difference_no_loss() {
        let b = test_house().heat_loss_at(5.0, 5.0);
        assert_eq!(b.total_loss, 0.0);
    }

    #[test]
    fn lumped_resistance() {
        let house = test_house();
        let g = 36.0 + 16.0 + 20.0 + 28.0;
        assert!((house.total_conductance() - g).abs() < 1e-12);
        assert!((house.estimated_thermal_resistance() - 1.0 / g).abs() < 1e-15);

        let sealed = BuildingEnvelope {
            walls: EnvelopeElement::new(10.0, 0.0),
            roof: EnvelopeElement::default(),
            floor: EnvelopeElement::default(),
            windows: EnvelopeElement::default(),
            ..house
        };
        assert!(sealed.estimated_thermal_resistance().is_infinite());
    }

    #[test]
    fn capacity_of_a_cube() {
        // 1000 m³ -> 600 m² of envelope
        let c = estimate_thermal_capacity(1000.0, &MassProperties::default()).unwrap();
        assert!((c - 600.0 * 0.3 * 1800.0 * 1000.0).abs() / c < 1e-12);
        assert!(estimate_thermal_capacity(0.0, &MassProperties::default()).is_err());
    }

    #[test]
    fn validation() {
        test_house().validate().unwrap();
        let bad = BuildingEnvelope {
            shgc: 1.5,
            ..test_house()
        };
        assert!(bad.validate().is_err());
    }
}
