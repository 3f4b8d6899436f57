use pagefall_engine::{SettingsBundle, World};

#[test]
fn settings_smoke_load_and_export() {
    let mut world = World::new();
    world
        .load_settings(r#"{"gravity_y": 20.0, "dynamic_pairs": true}"#.to_string())
        .expect("bundle should parse");

    let bundle = SettingsBundle::from_json(&world.get_settings_json()).expect("export parses");
    assert_eq!(bundle.gravity_y, 20.0);
    assert!(bundle.dynamic_pairs);
    // Defaults survive a partial bundle.
    assert!(bundle.ccd_enabled);
    assert_eq!(bundle.fixed_dt, 1.0 / 60.0);
}

#[test]
fn settings_smoke_rejects_garbage() {
    let mut world = World::new();
    assert!(world.load_settings("{not json".to_string()).is_err());
}
