use pn_project::schema::*;
use pn_project::{ProjectError, load_json, load_scenario, load_yaml, save_json, save_yaml};

fn scenario() -> Scenario {
    Scenario {
        version: SCHEMA_VERSION,
        name: "Roundtrip".to_string(),
        fluid: "Water at 20°C".to_string(),
        geometric_head_m: 15.0,
        library: UserLibraryDef {
            materials: vec![MaterialDef {
                name: "Lined steel".to_string(),
                roughness_mm: 0.02,
            }],
            fluids: vec![FluidDef {
                name: "Brine".to_string(),
                density_kg_m3: 1180.0,
                kinematic_viscosity_m2_s: 1.8e-6,
            }],
        },
        pump: PumpDef {
            head_curve: vec![
                SampleRowDef::numbers(0.0, 40.0),
                SampleRowDef {
                    flow: Some(CellDef::Text("50".to_string())),
                    value: Some(CellDef::Number(35.0)),
                },
                SampleRowDef {
                    flow: Some(CellDef::Number(100.0)),
                    value: None,
                },
            ],
            efficiency_curve: vec![SampleRowDef::numbers(50.0, 70.0)],
            degree: 2,
        },
        network: NetworkDef {
            before: vec![SegmentDef {
                id: Some("7d3f2c9e-4a51-4c1b-9f0e-2b8a6d5c1e44".to_string()),
                length_m: 10.0,
                diameter_mm: 100.0,
                material: "Carbon Steel (new)".to_string(),
                fittings: vec![FittingDef {
                    name: "Sharp-Edged Entrance".to_string(),
                    k: None,
                    quantity: 1,
                }],
            }],
            branches: vec![
                BranchDef {
                    name: "Branch 1".to_string(),
                    segments: vec![SegmentDef::new(20.0, 65.0, "Lined steel")],
                },
                BranchDef {
                    name: "Branch 2".to_string(),
                    segments: vec![SegmentDef::new(25.0, 80.0, "PVC / Plastic")],
                },
            ],
            after: vec![],
        },
        cost: CostDef {
            motor_efficiency_pct: 90.0,
            hours_per_day: 24.0,
            tariff_per_kwh: 0.15,
        },
        sensitivity: SensitivityDef::default(),
    }
}

#[test]
fn roundtrip_yaml() {
    let scenario = scenario();
    let path = std::env::temp_dir().join("pn_project_roundtrip.yaml");

    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json() {
    let scenario = scenario();
    let path = std::env::temp_dir().join("pn_project_roundtrip.json");

    save_json(&path, &scenario).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn format_follows_extension() {
    let scenario = scenario();
    let path = std::env::temp_dir().join("pn_project_by_extension.yml");
    pn_project::save_scenario(&path, &scenario).unwrap();
    assert_eq!(load_scenario(&path).unwrap(), scenario);

    let bad = std::env::temp_dir().join("pn_project_by_extension.toml");
    assert!(matches!(
        load_scenario(&bad),
        Err(ProjectError::UnsupportedFormat { .. })
    ));
}

#[test]
fn invalid_scenario_is_not_saved() {
    let mut scenario = scenario();
    scenario.network.branches[1].name = "Branch 1".to_string();
    let path = std::env::temp_dir().join("pn_project_invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &scenario),
        Err(ProjectError::Validation(_))
    ));
}

#[test]
fn minimal_yaml_gets_defaults() {
    let yaml = r#"
version: 1
name: minimal
fluid: Water at 20°C
geometric_head_m: 5
pump:
  head_curve:
    - { flow: 0, value: 20 }
    - { flow: "10", value: "18" }
    - { flow: oops, value: 1 }
cost:
  motor_efficiency_pct: 90
  hours_per_day: 12
  tariff_per_kwh: 0.1
"#;
    let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
    pn_project::validate_scenario(&scenario).unwrap();

    assert_eq!(scenario.pump.degree, 2);
    assert_eq!(scenario.sensitivity, SensitivityDef::default());
    assert!(scenario.network.before.is_empty());
    assert_eq!(scenario.pump.head_curve[0].flow, Some(CellDef::Number(0.0)));
    assert_eq!(
        scenario.pump.head_curve[1].value,
        Some(CellDef::Text("18".to_string()))
    );
    assert_eq!(
        scenario.pump.head_curve[2].flow,
        Some(CellDef::Text("oops".to_string()))
    );
}
