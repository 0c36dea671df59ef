//! Project schema definitions.
//!
//! Temperatures are in °C, areas in m², powers in W, conductances in W/K.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<EnvelopeDef>,
    #[serde(default)]
    pub glasshouses: Vec<GlasshouseCaseDef>,
    #[serde(default)]
    pub designs: Vec<DesignCaseDef>,
    #[serde(default)]
    pub radiation: Vec<RadiationCaseDef>,
    #[serde(default)]
    pub networks: Vec<NetworkCaseDef>,
    #[serde(default)]
    pub transients: Vec<TransientCaseDef>,
}

impl Project {
    /// Empty project at the latest schema version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            envelope: None,
            glasshouses: vec![],
            designs: vec![],
            radiation: vec![],
            networks: vec![],
            transients: vec![],
        }
    }
}

/// Single-zone building description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeDef {
    pub wall_area: f64,
    pub wall_u_value: f64,
    pub roof_area: f64,
    pub roof_u_value: f64,
    pub floor_area: f64,
    pub floor_u_value: f64,
    pub window_area: f64,
    pub window_u_value: f64,
    /// Solar heat gain coefficient of the glazing
    #[serde(default)]
    pub shgc: f64,
    /// Air changes per hour
    pub ventilation_rate: f64,
    /// m³
    pub building_volume: f64,
    pub indoor_temp: f64,
    /// Outdoor temperature for the steady heat-loss report
    pub design_outdoor_temp: f64,
}

/// Optical and film properties; any field left out takes its usual value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlasshousePropertiesDef {
    pub glass_transmittance: f64,
    pub glass_absorptance: f64,
    pub collector_absorptance: f64,
    pub emissivity_glass: f64,
    pub emissivity_collector: f64,
    pub emissivity_interior: f64,
    pub h_conv_ext: f64,
    pub h_conv_int: f64,
    pub u_back: f64,
}

impl Default for GlasshousePropertiesDef {
    fn default() -> Self {
        Self {
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

/// Damped iteration settings for the glasshouse balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IterationDef {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub relaxation: f64,
}

impl Default for IterationDef {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 0.01,
            relaxation: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlasshouseCaseDef {
    pub id: String,
    pub outdoor_temp: f64,
    /// W/m²
    pub solar_irradiance: f64,
    pub glass_area: f64,
    pub collector_area: f64,
    #[serde(default)]
    pub properties: GlasshousePropertiesDef,
    #[serde(default)]
    pub iteration: IterationDef,
    /// Report the heating load needed to reach this interior temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating_setpoint: Option<f64>,
}

/// Glazing-area sweep sized against a heating load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignCaseDef {
    pub id: String,
    pub outdoor_temp: f64,
    pub solar_irradiance: f64,
    /// Load to cover (W); the envelope heat loss at `outdoor_temp` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_load: Option<f64>,
    #[serde(default = "default_min_glass_area")]
    pub min_glass_area: f64,
    #[serde(default = "default_max_glass_area")]
    pub max_glass_area: f64,
    #[serde(default = "default_design_steps")]
    pub steps: usize,
}

fn default_min_glass_area() -> f64 {
    10.0
}

fn default_max_glass_area() -> f64 {
    100.0
}

fn default_design_steps() -> usize {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceDef {
    pub name: String,
    pub area: f64,
    pub emissivity: f64,
    /// Solar absorptance, for surfaces that receive sunlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absorptance: Option<f64>,
    /// Surface temperature; the case ambient when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewFactorDef {
    pub from: String,
    pub to: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadiationCaseDef {
    pub id: String,
    #[serde(default = "default_ambient_temp")]
    pub ambient_temp: f64,
    pub surfaces: Vec<SurfaceDef>,
    /// Explicit view factors; area ratios are used when empty
    #[serde(default)]
    pub view_factors: Vec<ViewFactorDef>,
}

fn default_ambient_temp() -> f64 {
    20.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConductanceDef {
    pub a: String,
    pub b: String,
    /// W/K
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkCaseDef {
    pub id: String,
    pub zones: Vec<String>,
    #[serde(default)]
    pub conductances: Vec<ConductanceDef>,
    #[serde(default)]
    pub boundary_temps: BTreeMap<String, f64>,
    #[serde(default)]
    pub heat_sources: BTreeMap<String, f64>,
    /// Overrides the reservoir coupling factor for boundary zones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_coupling: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorDef {
    Explicit,
    #[default]
    Implicit,
}

/// Per-step forcing columns. Solar input is given either as gains (W) or as
/// irradiance on the envelope glazing (W/m²), never both; missing columns
/// are zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ForcingDef {
    pub outdoor_temps: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solar_gains: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solar_irradiance: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub heating: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransientCaseDef {
    pub id: String,
    pub initial_temp: f64,
    /// Timestep (s)
    pub dt: f64,
    #[serde(default)]
    pub integrator: IntegratorDef,
    /// K/W; estimated from the envelope when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    /// J/K; estimated from the envelope when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    pub forcing: ForcingDef,
}
