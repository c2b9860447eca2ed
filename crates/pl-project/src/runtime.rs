//! Conversion from scenario definitions to simulator inputs, and execution.

use pl_sim::{
    PidGains, ReferenceSpec, SimError, SimResult, SimulationConfig, SimulationStep, StepPoint,
    run, run_seeded,
};
use tracing::info;

use crate::schema::{PidDef, ReferenceDef, Scenario, SimulationDef};

impl From<PidDef> for PidGains {
    fn from(def: PidDef) -> Self {
        PidGains::new(def.kp, def.ki, def.kd)
    }
}

impl From<SimulationDef> for SimulationConfig {
    fn from(def: SimulationDef) -> Self {
        SimulationConfig {
            duration: def.duration_s,
            dt: def.dt_s,
            plant_time_constant: def.plant_tau_s,
            noise_std_dev: def.noise_std_dev,
        }
    }
}

impl ReferenceDef {
    /// # Errors
    ///
    /// `SimError::Config` for an unrecognized reference `type`.
    pub fn to_spec(&self) -> SimResult<ReferenceSpec> {
        match self {
            ReferenceDef::Constant { value } => Ok(ReferenceSpec::constant(*value)),
            ReferenceDef::StepSequence { steps } => Ok(ReferenceSpec::StepSequence {
                steps: steps
                    .iter()
                    .map(|s| StepPoint::new(s.time_s, s.value))
                    .collect(),
            }),
            ReferenceDef::Sine {
                amplitude,
                frequency_hz,
                offset,
            } => Ok(ReferenceSpec::sine(*amplitude, *frequency_hz, *offset)),
            ReferenceDef::Unknown => Err(SimError::Config {
                what: "unrecognized reference type",
            }),
        }
    }
}

impl Scenario {
    /// Split the scenario into the three simulator inputs.
    pub fn to_runtime(&self) -> SimResult<(PidGains, SimulationConfig, ReferenceSpec)> {
        Ok((
            self.pid.into(),
            self.simulation.into(),
            self.reference.to_spec()?,
        ))
    }
}

/// Run `scenario`, seeded when `seed_override` or the scenario's own seed is set.
pub fn run_scenario(
    scenario: &Scenario,
    seed_override: Option<u64>,
) -> SimResult<Vec<SimulationStep>> {
    let (gains, config, spec) = scenario.to_runtime()?;
    let seed = seed_override.or(scenario.seed);

    let steps = match seed {
        Some(seed) => run_seeded(&gains, &config, &spec, seed)?,
        None => run(&gains, &config, &spec)?,
    };

    info!(
        scenario = %scenario.name,
        seed = ?seed,
        samples = steps.len(),
        "scenario run complete"
    );
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_converts() {
        let (gains, config, spec) = Scenario::default().to_runtime().unwrap();
        assert_eq!(gains, PidGains::new(1.0, 0.5, 0.1));
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(
            spec,
            ReferenceSpec::steps([(0.0, 0.0), (2.0, 100.0), (5.0, 50.0)])
        );
    }

    #[test]
    fn unknown_reference_is_config_error() {
        let scenario = Scenario {
            reference: ReferenceDef::Unknown,
            ..Scenario::default()
        };
        assert!(matches!(
            scenario.to_runtime(),
            Err(SimError::Config { .. })
        ));
        assert!(run_scenario(&scenario, Some(1)).is_err());
    }

    #[test]
    fn seed_override_wins() {
        let scenario = Scenario {
            seed: Some(1),
            simulation: SimulationDef {
                noise_std_dev: 1.0,
                duration_s: 1.0,
                ..SimulationDef::default()
            },
            ..Scenario::default()
        };
        let from_file = run_scenario(&scenario, None).unwrap();
        let same = run_scenario(&scenario, Some(1)).unwrap();
        let other = run_scenario(&scenario, Some(2)).unwrap();
        assert_eq!(from_file, same);
        assert_ne!(from_file, other);
    }
}
