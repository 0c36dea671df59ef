//! Numerical core for building heat-transfer problems.
//!
//! This crate provides the dense linear solver shared by every model, a
//! radiosity engine for N-surface longwave exchange, a conductance-network
//! solver for multi-zone steady temperatures, and the damped fixed-point
//! solver for the three-node glasshouse energy balance.

pub mod error;
pub mod glasshouse;
pub mod linear;
pub mod network;
pub mod radiosity;
pub mod relax;

pub use error::{SolverError, SolverResult};
pub use glasshouse::{
    GlasshouseParams, GlasshouseSolution, radiative_coefficient, solve_glasshouse_temperatures,
};
pub use linear::{solve_dense, solve_linear_system};
pub use network::{
    NetworkOptions, ThermalNetwork, solve_multi_zone_temperatures,
    solve_multi_zone_temperatures_with,
};
pub use radiosity::{
    RadiationSystem, Surface, SurfaceExchange, SurfaceSpec, ViewFactors, solve_radiation_exchange,
};
pub use relax::{IterationState, RelaxConfig, RelaxOutcome, relaxed_fixed_point};
