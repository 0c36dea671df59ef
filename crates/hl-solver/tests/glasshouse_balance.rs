//! Glasshouse energy balance on the reference sunspace.

use hl_solver::{
    GlasshouseParams, IterationState, RelaxConfig, solve_glasshouse_temperatures,
};

#[test]
fn reference_sunspace_converges() {
    // 0 °C outside, 500 W/m² on 20 m² of glazing over a 16 m² collector.
    let params = GlasshouseParams::new(0.0, 500.0, 20.0, 16.0);
    let sol = solve_glasshouse_temperatures(&params, &RelaxConfig::default()).unwrap();

    println!(
        "interior {:.2} °C, glass {:.2} °C, collector {:.2} °C after {} iterations",
        sol.interior_temp, sol.glass_temp, sol.collector_temp, sol.iterations
    );

    assert!(sol.converged());
    assert_eq!(sol.state, IterationState::Converged);
    assert!(sol.iterations <= 100);
    assert_eq!(sol.max_change_history.len(), sol.iterations);
    assert!(sol.abort_reason.is_none());

    for t in [sol.interior_temp, sol.glass_temp, sol.collector_temp] {
        assert!((0.0..=100.0).contains(&t), "temperature {t} out of range");
    }

    // Collector is the hottest node, glazing sits between outdoor and interior.
    assert!(sol.collector_temp > sol.interior_temp);
    assert!(sol.interior_temp > sol.glass_temp);
    assert!(sol.glass_temp > 0.0);
}

#[test]
fn max_change_settles_monotonically() {
    let params = GlasshouseParams::new(0.0, 500.0, 20.0, 16.0);
    let sol = solve_glasshouse_temperatures(&params, &RelaxConfig::default()).unwrap();

    let history = &sol.max_change_history;
    assert!(history.len() > 2);
    for pair in history[2..].windows(2) {
        assert!(
            pair[1] <= pair[0] + 1e-9,
            "change grew from {} to {}",
            pair[0],
            pair[1]
        );
    }
    assert!(*history.last().unwrap() < 0.01);
}

#[test]
fn more_sun_means_warmer_interior() {
    let config = RelaxConfig::default();
    let dim = solve_glasshouse_temperatures(&GlasshouseParams::new(0.0, 200.0, 20.0, 16.0), &config)
        .unwrap();
    let bright =
        solve_glasshouse_temperatures(&GlasshouseParams::new(0.0, 600.0, 20.0, 16.0), &config)
            .unwrap();
    assert!(dim.converged() && bright.converged());
    assert!(bright.interior_temp > dim.interior_temp);
    assert!(bright.collector_temp > dim.collector_temp);
}

#[test]
fn zero_irradiance_settles_at_outdoor() {
    for outdoor in [-10.0, 0.0, 12.0] {
        let params = GlasshouseParams::new(outdoor, 0.0, 20.0, 16.0);
        let sol = solve_glasshouse_temperatures(&params, &RelaxConfig::default()).unwrap();
        assert!(sol.converged());
        assert!((sol.interior_temp - outdoor).abs() < 0.05);
        assert!((sol.glass_temp - outdoor).abs() < 0.05);
        assert!((sol.collector_temp - outdoor).abs() < 0.05);
    }
}

#[test]
fn solution_serializes() {
    let sol = solve_glasshouse_temperatures(
        &GlasshouseParams::new(0.0, 500.0, 20.0, 16.0),
        &RelaxConfig::default(),
    )
    .unwrap();
    let json = serde_json::to_string(&sol).unwrap();
    assert!(json.contains("\"state\":\"Converged\""));
    assert!(!json.contains("abort_reason"));
}
