use std::path::PathBuf;

#[test]
fn demo_project_loads_and_validates() {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");
    let path = root.join("demos/projects/demo_house.yaml");

    let project = hl_project::load_yaml(&path)
        .unwrap_or_else(|e| panic!("failed to load {}: {}", path.display(), e));

    assert_eq!(project.version, hl_project::LATEST_VERSION);
    assert!(project.envelope.is_some());
    assert_eq!(project.glasshouses.len(), 2);
    assert_eq!(project.networks[0].zones.len(), 4);
    assert_eq!(project.transients[0].forcing.outdoor_temps.len(), 24);

    let overcast = &project.glasshouses[1];
    assert_eq!(overcast.properties.glass_transmittance, 0.78);
    assert_eq!(overcast.properties.collector_absorptance, 0.90);
    assert_eq!(overcast.iteration.max_iterations, 200);
    assert_eq!(overcast.iteration.relaxation, 0.5);

    assert_eq!(project.designs[0].steps, 20);
    assert_eq!(project.radiation[0].surfaces[1].temperature, None);
}
