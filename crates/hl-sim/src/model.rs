//! Lumped RC zone model.
//!
//! One thermal resistance `R` (K/W) to the outdoor air and one heat capacity
//! `C` (J/K):
//!
//! ```text
//! C·dT/dt = (T_out − T)/R + Φ_heat + Q_solar
//! ```

use hl_core::ensure_positive;
use serde::{Deserialize, Serialize};

use crate::error::SimResult;

/// Boundary inputs acting on the zone over one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Forcing {
    /// Outdoor temperature (°C)
    pub outdoor_temp: f64,
    /// Solar gain (W)
    pub solar_gain: f64,
    /// Heating input (W)
    pub heating: f64,
}

impl Forcing {
    pub fn new(outdoor_temp: f64, solar_gain: f64, heating: f64) -> Self {
        Self {
            outdoor_temp,
            solar_gain,
            heating,
        }
    }

    /// Total power injected into the zone (W).
    pub fn gains(&self) -> f64 {
        self.heating + self.solar_gain
    }
}

/// Single-zone RC thermal model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RcModel {
    /// Resistance to outdoors (K/W)
    pub resistance: f64,
    /// Heat capacity (J/K)
    pub capacity: f64,
}

impl RcModel {
    pub fn new(resistance: f64, capacity: f64) -> SimResult<Self> {
        let model = Self {
            resistance,
            capacity,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.resistance, "thermal resistance")?;
        ensure_positive(self.capacity, "thermal capacity")?;
        Ok(())
    }

    /// Time constant `R·C` (s).
    pub fn time_constant(&self) -> f64 {
        self.resistance * self.capacity
    }

    /// `dT/dt` (K/s) at zone temperature `t`.
    pub fn derivative(&self, t: f64, forcing: &Forcing) -> f64 {
        ((forcing.outdoor_temp - t) / self.resistance + forcing.gains()) / self.capacity
    }

    /// Heat lost to outdoors net of solar gain (W), evaluated at `t`.
    ///
    /// This is the heating power that would hold the zone at `t`; it is
    /// reported alongside a simulation and never fed back into it.
    pub fn heating_load(&self, t: f64, forcing: &Forcing) -> f64 {
        (t - forcing.outdoor_temp) / self.resistance - forcing.solar_gain
    }
}
