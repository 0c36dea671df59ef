//! SI unit helpers (uom) and physical constants.

use uom::si::f64::{Power as UomPower, ThermodynamicTemperature as UomThermodynamicTemperature};

// Public canonical unit types (SI, f64)
pub type Power = UomPower;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

/// Convert a Celsius reading to kelvin.
#[inline]
pub fn celsius_to_kelvin(c: f64) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    degc(c).get::<kelvin>()
}

/// Convert a kelvin reading to Celsius.
#[inline]
pub fn kelvin_to_celsius(t: f64) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    k(t).get::<degree_celsius>()
}

pub mod constants {
    /// Stefan–Boltzmann constant (W/m²·K⁴).
    pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;

    /// 0 °C expressed in kelvin.
    pub const ZERO_CELSIUS_K: f64 = 273.15;

    /// Air density used for ventilation losses (kg/m³).
    pub const AIR_DENSITY: f64 = 1.2;

    /// Specific heat of air (J/kg·K).
    pub const AIR_SPECIFIC_HEAT: f64 = 1005.0;

    /// Blackbody emissive power `σ·T⁴` (W/m²) for a temperature in kelvin.
    #[inline]
    pub fn blackbody_power(t_kelvin: f64) -> f64 {
        STEFAN_BOLTZMANN * t_kelvin.powi(4)
    }
}
