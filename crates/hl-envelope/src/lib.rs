//! Steady-state building envelope calculations.
//!
//! - conduction: wall resistances, U-values, fabric and ventilation losses,
//!   lumped RC parameters for a whole building
//! - radiation: point formulas for longwave exchange and solar absorption
//! - passive: glasshouse heating load, passive gain and design sweep

pub mod conduction;
pub mod error;
pub mod passive;
pub mod radiation;

pub use conduction::{
    BuildingEnvelope, EnvelopeElement, HeatLossBreakdown, MassProperties, conductive_loss,
    estimate_thermal_capacity, thermal_resistance, thermal_resistance_with_films, u_value,
    ventilation_loss,
};
pub use error::{EnvelopeError, EnvelopeResult};
pub use passive::{
    DesignSweep, GlasshouseDesign, glasshouse_heating_load, optimize_glasshouse_design,
    passive_solar_gain,
};
pub use radiation::{
    floor_temperature_from_radiosity, longwave_radiation_to_sky, parallel_surface_view_factors,
    radiation_coefficient, radiative_heat_transfer, solar_radiation_absorbed,
};
