use rx_scenario::{
    Scenario, ScenarioError, ValidationError, build_plant, load, load_json, load_yaml,
    run_scenario, save_json, save_yaml,
};
use rx_sim::{InterlockParams, OperatorCommand, Regime, ScheduledCommand};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("rx_scenario_{}_{name}", std::process::id()))
}

#[test]
fn roundtrip_yaml_template() {
    let scenario = Scenario::startup_template();
    let path = temp_path("template.yaml");

    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json_with_interlock() {
    let mut scenario = Scenario::startup_template();
    scenario.name = "Interlocked".to_string();
    scenario.reactor.interlock = Some(InterlockParams::default());
    scenario.coupled = false;
    let path = temp_path("interlock.json");

    save_json(&path, &scenario).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn minimal_yaml_takes_defaults() {
    let path = temp_path("minimal.yaml");
    std::fs::write(&path, "version: 1\nname: Minimal\n").unwrap();

    let loaded = load(&path).unwrap();
    let expected = Scenario::new("Minimal");
    assert_eq!(loaded, expected);
    assert!(loaded.coupled);
    assert!(loaded.commands.is_empty());
}

#[test]
fn yaml_commands_parse() {
    let yaml = r#"
version: 1
name: Hand written
reactor:
  refill_rate: 0.3
session:
  t_end: 10
commands:
  - at_s: 0
    type: toggle_fuel_valve
  - at_s: 0.5
    type: set_valve
    fraction: 1
  - at_s: 1
    type: ignite
  - at_s: 5
    type: vent
    on: true
"#;
    let path = temp_path("commands.yaml");
    std::fs::write(&path, yaml).unwrap();

    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded.reactor.refill_rate, 0.3);
    assert_eq!(loaded.reactor.burn_rate, 0.1);
    assert_eq!(loaded.session.t_end, 10.0);
    assert_eq!(
        loaded.commands,
        vec![
            ScheduledCommand::new(0.0, OperatorCommand::ToggleFuelValve),
            ScheduledCommand::new(0.5, OperatorCommand::SetValve { fraction: 1.0 }),
            ScheduledCommand::new(1.0, OperatorCommand::Ignite),
            ScheduledCommand::new(5.0, OperatorCommand::Vent { on: true }),
        ]
    );
}

#[test]
fn invalid_file_rejected_on_load() {
    let yaml = r#"
version: 1
name: Backwards
commands:
  - at_s: 3
    type: ignite
  - at_s: 1
    type: ignite
"#;
    let path = temp_path("backwards.yaml");
    std::fs::write(&path, yaml).unwrap();

    let err = load_yaml(&path).unwrap_err();
    assert!(matches!(
        err,
        ScenarioError::Validation(ValidationError::Unordered { .. })
    ));
}

#[test]
fn oversized_valve_fraction_runs_clamped() {
    let yaml = r#"
version: 1
name: Wide open
session:
  t_end: 0.5
commands:
  - at_s: 0
    type: set_valve
    fraction: 2.5
"#;
    let path = temp_path("wide_open.yaml");
    std::fs::write(&path, yaml).unwrap();

    let scenario = load_yaml(&path).unwrap();
    let record = run_scenario(&scenario, None).unwrap();
    assert_eq!(record.stats.commands_applied, 1);
    assert!(record.x.iter().all(|s| s.valve == 1.0));
}

#[test]
fn invalid_scenario_not_saved() {
    let mut scenario = Scenario::new("bad");
    scenario.tank.inflow_rate = -1.0;
    let path = temp_path("never_written.yaml");
    let _ = std::fs::remove_file(&path);

    assert!(save_yaml(&path, &scenario).is_err());
    assert!(!path.exists());
}

#[test]
fn missing_file_is_io_error() {
    let err = load_yaml(&temp_path("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, ScenarioError::Io(_)));
}

#[test]
fn built_plant_matches_parameters() {
    let mut scenario = Scenario::new("Plant");
    scenario.reactor.initial_fuel = 0.5;
    scenario.tank.initial_water = 0.25;
    scenario.coupled = false;

    let plant = build_plant(&scenario).unwrap();
    assert_eq!(plant.reactor.fuel(), 0.5);
    assert_eq!(plant.tank.water(), 0.25);
    assert!(!plant.coupled);
}

#[test]
fn template_burns_through_its_charge() {
    let mut scenario = Scenario::startup_template();
    scenario.session.t_end = 60.0;

    let record = run_scenario(&scenario, None).unwrap();
    assert_eq!(record.stats.commands_applied, scenario.commands.len());
    assert!(record.stats.peak_neutrons > 2.0);
    assert!(record.stats.peak_tank_heat > 0.0);
    let last = record.last().unwrap();
    assert!(last.fuel_valve);
    assert!(!last.venting);
    // Spent core refills through the open intake but stays unignited.
    assert!(!last.ignited);
    assert_eq!(last.regime, Regime::Subcritical);
    assert_eq!(last.fuel, 1.0);
}
