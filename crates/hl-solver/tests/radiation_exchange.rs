//! Named-surface radiation exchange.

use std::collections::BTreeMap;

use hl_core::units::constants::blackbody_power;
use hl_core::celsius_to_kelvin;
use hl_solver::{SurfaceSpec, solve_radiation_exchange};
use proptest::prelude::*;

fn spec(area: f64, emissivity: f64, temperature: Option<f64>) -> SurfaceSpec {
    SurfaceSpec {
        area,
        emissivity,
        temperature,
    }
}

#[test]
fn room_surfaces_at_ambient_exchange_nothing() {
    let surfaces = BTreeMap::from([
        ("floor".to_string(), spec(20.0, 0.9, None)),
        ("ceiling".to_string(), spec(20.0, 0.9, None)),
        ("window".to_string(), spec(4.0, 0.84, None)),
    ]);
    let out = solve_radiation_exchange(&surfaces, 21.0).unwrap();
    assert_eq!(out.len(), 3);
    for (name, ex) in &out {
        assert!(ex.net_flux.abs() < 1e-8, "{name}: {}", ex.net_flux);
    }
}

#[test]
fn cold_window_gains_heat_from_warm_floor() {
    let surfaces = BTreeMap::from([
        ("floor".to_string(), spec(20.0, 0.9, Some(24.0))),
        ("window".to_string(), spec(4.0, 0.84, Some(5.0))),
    ]);
    let out = solve_radiation_exchange(&surfaces, 20.0).unwrap();
    assert!(out["floor"].net_flux > 0.0);
    assert!(out["window"].net_flux < 0.0);
    let e_floor = blackbody_power(celsius_to_kelvin(24.0));
    assert!((out["floor"].emissive_power - e_floor).abs() < 1e-9);
}

proptest! {
    #[test]
    fn black_surfaces_report_exactly_zero_flux(
        a1 in 1.0f64..50.0,
        a2 in 1.0f64..50.0,
        t1 in -20.0f64..80.0,
        t2 in -20.0f64..80.0,
        eps_other in 0.1f64..0.99,
    ) {
        let surfaces = BTreeMap::from([
            ("black".to_string(), spec(a1, 1.0, Some(t1))),
            ("grey".to_string(), spec(a2, eps_other, Some(t2))),
        ]);
        let out = solve_radiation_exchange(&surfaces, 20.0).unwrap();
        prop_assert_eq!(out["black"].net_flux, 0.0);
        prop_assert!(out["grey"].net_flux.is_finite());
    }
}
