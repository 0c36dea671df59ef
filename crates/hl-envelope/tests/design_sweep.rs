//! Glasshouse design sweep against a building heat loss.

use hl_envelope::{
    BuildingEnvelope, DesignSweep, EnvelopeElement, optimize_glasshouse_design,
    passive_solar_gain,
};

fn house() -> BuildingEnvelope {
    BuildingEnvelope {
        walls: EnvelopeElement::new(150.0, 0.35),
        roof: EnvelopeElement::new(90.0, 0.25),
        floor: EnvelopeElement::new(90.0, 0.3),
        windows: EnvelopeElement::new(18.0, 1.6),
        shgc: 0.55,
        air_changes_per_hour: 0.6,
        volume: 450.0,
        indoor_temp: 20.0,
    }
}

#[test]
fn smallest_qualifying_area_is_selected() {
    // Gain per m² of glazing at 500 W/m²: 500·(0.85 + 0.9·0.85·0.8) = 731 W.
    let design = optimize_glasshouse_design(0.0, 500.0, 20_000.0, &DesignSweep::default()).unwrap();
    println!("{design:?}");

    assert!(design.meets_load);
    assert!((design.glass_area - 28.0).abs() < 1e-9);
    assert!((design.collector_area - 22.4).abs() < 1e-9);
    assert!(design.passive_gain >= 0.9 * 20_000.0);
    assert!(design.interior_temp > 0.0);

    let one_step_smaller = passive_solar_gain(23.5, 0.85, 500.0, 23.5 * 0.8, 0.9);
    assert!(one_step_smaller < 0.9 * 20_000.0);
}

#[test]
fn real_building_load_drives_the_sweep() {
    let load = house().heat_loss(-5.0).total_loss;
    let design = optimize_glasshouse_design(-5.0, 600.0, load, &DesignSweep::default()).unwrap();
    assert!(design.meets_load);
    assert!(design.efficiency >= 0.9);
}

#[test]
fn falls_back_to_largest_candidate_without_sun() {
    let sweep = DesignSweep {
        min_glass_area: 10.0,
        max_glass_area: 40.0,
        steps: 3,
    };
    let design = optimize_glasshouse_design(2.0, 0.0, 5_000.0, &sweep).unwrap();
    assert!(!design.meets_load);
    assert!((design.glass_area - 40.0).abs() < 1e-9);
    assert_eq!(design.passive_gain, 0.0);
    assert!((design.interior_temp - 2.0).abs() < 0.05);
}

#[test]
fn invalid_inputs_rejected() {
    assert!(optimize_glasshouse_design(0.0, -1.0, 1000.0, &DesignSweep::default()).is_err());
    assert!(optimize_glasshouse_design(f64::NAN, 100.0, 1000.0, &DesignSweep::default()).is_err());
}
