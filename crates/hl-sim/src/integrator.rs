//! Fixed-step time integrators for the RC zone.

use crate::model::{Forcing, RcModel};

/// Trait for time integrators.
pub trait Integrator {
    /// Advance the zone temperature by one step of `dt` seconds.
    fn step(&self, model: &RcModel, t: f64, forcing: &Forcing, dt: f64) -> f64;
}

/// Forward Euler (explicit, 1st order).
///
/// Conditionally stable: overshoots once `dt` exceeds the time constant
/// and diverges past `2·R·C`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step(&self, model: &RcModel, t: f64, forcing: &Forcing, dt: f64) -> f64 {
        t + dt * model.derivative(t, forcing)
    }
}

/// Backward Euler (implicit, 1st order, unconditionally stable).
///
/// The model is linear in `T`, so the implicit equation is solved in
/// closed form.
#[derive(Clone, Copy, Debug, Default)]
pub struct BackwardEuler;

impl Integrator for BackwardEuler {
    fn step(&self, model: &RcModel, t: f64, forcing: &Forcing, dt: f64) -> f64 {
        let r = dt / model.time_constant();
        (t + r * (forcing.outdoor_temp + model.resistance * forcing.gains())) / (1.0 + r)
    }
}

/// One explicit step: `T + (Δt/C)·[(T_out − T)/R + Φ + Q_solar]`.
pub fn explicit_step(
    t: f64,
    outdoor_temp: f64,
    solar_gain: f64,
    heating: f64,
    resistance: f64,
    capacity: f64,
    dt: f64,
) -> f64 {
    let model = RcModel {
        resistance,
        capacity,
    };
    ForwardEuler.step(&model, t, &Forcing::new(outdoor_temp, solar_gain, heating), dt)
}

/// One implicit step: `[T + (Δt/RC)·(T_out + R·(Φ + Q_solar))] / [1 + Δt/RC]`.
pub fn implicit_step(
    t: f64,
    outdoor_temp: f64,
    solar_gain: f64,
    heating: f64,
    resistance: f64,
    capacity: f64,
    dt: f64,
) -> f64 {
    let model = RcModel {
        resistance,
        capacity,
    };
    BackwardEuler.step(&model, t, &Forcing::new(outdoor_temp, solar_gain, heating), dt)
}
