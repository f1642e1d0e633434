//! rx-scenario: scenario file format, validation and plant construction.

pub mod schema;
pub mod validate;

pub use schema::{LATEST_VERSION, Scenario};
pub use validate::{ValidationError, validate_scenario};

use rx_sim::{Plant, SessionProgress, SessionRecord, SimError, run_session_with_progress};
use tracing::info;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario)?;
    info!(path = %path.display(), name = %scenario.name, "loaded scenario");
    Ok(scenario)
}

pub fn save_yaml(path: &std::path::Path, scenario: &Scenario) -> ScenarioResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    validate_scenario(&scenario)?;
    info!(path = %path.display(), name = %scenario.name, "loaded scenario");
    Ok(scenario)
}

pub fn save_json(path: &std::path::Path, scenario: &Scenario) -> ScenarioResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> ScenarioResult<Scenario> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}

/// Plant in its initial state for this scenario.
pub fn build_plant(scenario: &Scenario) -> ScenarioResult<Plant> {
    Ok(Plant::with_params(
        scenario.reactor.clone(),
        scenario.tank.clone(),
        scenario.coupled,
    )?)
}

/// Validate, build and run a scenario from its initial state.
pub fn run_scenario(
    scenario: &Scenario,
    progress: Option<&mut dyn FnMut(&SessionProgress)>,
) -> ScenarioResult<SessionRecord> {
    validate_scenario(scenario)?;
    let mut plant = build_plant(scenario)?;
    info!(
        name = %scenario.name,
        commands = scenario.commands.len(),
        coupled = scenario.coupled,
        "running scenario"
    );
    let record = run_session_with_progress(
        &mut plant,
        &scenario.session,
        &scenario.commands,
        progress,
    )?;
    Ok(record)
}
