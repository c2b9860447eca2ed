//! pl-project: scenario file format and validation.

pub mod runtime;
pub mod schema;
pub mod validate;

pub use runtime::run_scenario;
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_scenario_file};

use std::path::Path;
use tracing::info;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Simulation error: {0}")]
    Sim(#[from] pl_sim::SimError),

    #[error("Unsupported scenario file extension: {0:?}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Full validation: file-level checks plus the simulator's own configuration checks.
pub fn validate_scenario(scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario_file(scenario)?;
    let (_, config, spec) = scenario.to_runtime()?;
    config.validate()?;
    spec.validate().map_err(pl_sim::SimError::from)?;
    Ok(())
}

pub fn load_yaml(path: &Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario)?;
    info!(path = %path.display(), name = %scenario.name, "loaded scenario");
    Ok(scenario)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    info!(path = %path.display(), "saved scenario");
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    validate_scenario(&scenario)?;
    info!(path = %path.display(), name = %scenario.name, "loaded scenario");
    Ok(scenario)
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    info!(path = %path.display(), "saved scenario");
    Ok(())
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> ProjectResult<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "yaml" | "yml" => Ok(Format::Yaml),
        "json" => Ok(Format::Json),
        _ => Err(ProjectError::UnsupportedFormat(ext)),
    }
}

/// Load a scenario, choosing YAML or JSON by file extension.
pub fn load_scenario(path: &Path) -> ProjectResult<Scenario> {
    match format_of(path)? {
        Format::Yaml => load_yaml(path),
        Format::Json => load_json(path),
    }
}

/// Save a scenario, choosing YAML or JSON by file extension.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    match format_of(path)? {
        Format::Yaml => save_yaml(path, scenario),
        Format::Json => save_json(path, scenario),
    }
}
