//! Scenario validation logic.

use crate::schema::Scenario;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// File-level checks. Simulation parameters are checked by the simulator
/// itself when the scenario is converted (see [`crate::validate_scenario`]).
pub fn validate_scenario_file(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: format!("{:?}", scenario.name),
            reason: "must not be empty".to_string(),
        });
    }

    for (field, value) in [
        ("pid.kp", scenario.pid.kp),
        ("pid.ki", scenario.pid.ki),
        ("pid.kd", scenario.pid.kd),
    ] {
        if !value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }

    Ok(())
}
