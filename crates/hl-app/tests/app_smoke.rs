//! Smoke test for the hl-app service layer against the demo project.

use std::path::PathBuf;

use hl_app::{
    AppError, ReportFormat, list_cases, load_project, render_report, run_project, validate_project,
};

fn demo_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // crates
    path.pop(); // repo root
    path.push("demos");
    path.push("projects");
    path.push("demo_house.yaml");
    path
}

#[test]
fn demo_project_runs_end_to_end() {
    let project = load_project(&demo_path()).expect("Failed to load demo project");
    validate_project(&project).expect("Validation should succeed");

    let cases = list_cases(&project);
    assert_eq!(cases.len(), 7);
    assert_eq!(cases[0].kind, "glasshouse");
    assert_eq!(cases[6].id, "heated_explicit");

    let report = run_project(&project).expect("Demo project should run");

    let envelope = report.envelope.as_ref().expect("envelope report");
    assert!(envelope.heat_loss.total_loss > 0.0);
    assert!((envelope.thermal_resistance * envelope.total_conductance - 1.0).abs() < 1e-12);

    let noon = &report.glasshouses[0];
    assert!(noon.solution.converged());
    assert!(noon.solution.interior_temp > 0.0);
    assert!(noon.heating_load.is_some());

    // No explicit load: the design is sized against the envelope loss at -5 °C.
    let design = &report.designs[0];
    assert!((design.building_load - envelope.heat_loss.total_loss).abs() < 1e-9);
    assert!(design.design.glass_area >= 10.0 && design.design.glass_area <= 100.0);

    let room = &report.radiation[0];
    assert!(room.surfaces["floor"].net_flux > 0.0);
    assert!(room.surfaces["window"].net_flux < 0.0);

    let temps = &report.networks[0].temperatures;
    assert!((temps["outside"] + 5.0).abs() < 1e-3);
    assert!(temps["living"] > temps["attic"]);
    assert!(temps.values().all(|&t| t > -5.0 - 1e-3));

    let heated = &report.transients[1];
    assert_eq!(heated.temperatures.len(), 9);
    assert_eq!(heated.duration, 8.0 * 900.0);
    assert!(heated.final_temperature > 16.0 && heated.final_temperature < 24.0);
    assert!(heated.energy_stored > 0.0);
    assert!((heated.time_constant - 8.0e4).abs() < 1e-6);
}

#[test]
fn reports_render_as_yaml_and_json() {
    let project = load_project(&demo_path()).expect("Failed to load demo project");
    let report = run_project(&project).expect("Demo project should run");

    let json = render_report(&report, ReportFormat::Json).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["networks"][0]["id"], "three_rooms");

    let yaml = render_report(&report, ReportFormat::Yaml).expect("yaml");
    assert!(yaml.contains("winter_noon"));
}

#[test]
fn failing_case_is_named_in_the_error() {
    let mut project = load_project(&demo_path()).expect("Failed to load demo project");
    // A floating zone makes the network singular.
    project.networks[0].boundary_temps.clear();

    match run_project(&project) {
        Err(AppError::Case { id, .. }) => assert_eq!(id, "three_rooms"),
        other => panic!("expected a case error, got {other:?}"),
    }
}
