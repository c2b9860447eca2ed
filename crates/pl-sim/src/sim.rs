//! Simulation runner and result recording.

use pl_controls::{PidController, PidGains, ReferenceSpec, reference};
use pl_core::{ensure_finite, whole_steps};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::noise::NoiseSource;
use crate::plant::{FirstOrderPlant, PlantState};

/// Upper bound on `duration / dt`; longer runs are rejected by
/// [`SimulationConfig::validate`] before any sample is allocated.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Options for a closed-loop run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulated span (seconds)
    pub duration: f64,
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Plant time constant (seconds)
    pub plant_time_constant: f64,
    /// Standard deviation of the disturbance added to the control signal
    pub noise_std_dev: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: 10.0,
            dt: 0.01,
            plant_time_constant: 1.0,
            noise_std_dev: 0.0,
        }
    }
}

impl SimulationConfig {
    /// Check the run parameters, reporting the first violated constraint.
    ///
    /// # Errors
    ///
    /// `Config` for non-finite fields, `duration <= 0`, `dt <= 0`,
    /// `dt > duration`, `duration / dt >= MAX_SAMPLES`,
    /// `plant_time_constant <= 0` or `noise_std_dev < 0`.
    pub fn validate(&self) -> SimResult<()> {
        finite(self.duration, "duration must be finite")?;
        finite(self.dt, "dt must be finite")?;
        finite(self.plant_time_constant, "plant time constant must be finite")?;
        finite(self.noise_std_dev, "noise std_dev must be finite")?;

        if self.duration <= 0.0 {
            return Err(SimError::Config {
                what: "duration must be positive",
            });
        }
        if self.dt <= 0.0 {
            return Err(SimError::Config {
                what: "dt must be positive",
            });
        }
        if self.dt > self.duration {
            return Err(SimError::Config {
                what: "dt must not exceed duration",
            });
        }
        if self.duration / self.dt >= MAX_SAMPLES as f64 {
            return Err(SimError::Config {
                what: "too many samples",
            });
        }
        if self.plant_time_constant <= 0.0 {
            return Err(SimError::Config {
                what: "plant time constant must be positive",
            });
        }
        if self.noise_std_dev < 0.0 {
            return Err(SimError::Config {
                what: "noise std_dev must be non-negative",
            });
        }
        Ok(())
    }
}

fn finite(v: f64, what: &'static str) -> SimResult<()> {
    ensure_finite(v, what)
        .map(|_| ())
        .map_err(|_| SimError::Config { what })
}

/// One recorded sample of the closed loop.
///
/// `error` and `control` were computed from the output carried in from the
/// previous sample; `output` is the plant value after this sample's update.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationStep {
    pub time: f64,
    pub reference: f64,
    pub output: f64,
    pub error: f64,
    pub control: f64,
}

/// Number of samples `config` produces: `floor(duration / dt) + 1`.
///
/// # Errors
///
/// Whatever [`SimulationConfig::validate`] reports.
pub fn step_count(config: &SimulationConfig) -> SimResult<usize> {
    config.validate()?;
    Ok(intervals(config)? + 1)
}

fn intervals(config: &SimulationConfig) -> SimResult<usize> {
    whole_steps(config.duration, config.dt).ok_or(SimError::Config {
        what: "too many samples",
    })
}

/// Run with a fresh controller and an entropy-seeded disturbance.
pub fn run(
    gains: &PidGains,
    config: &SimulationConfig,
    spec: &ReferenceSpec,
) -> SimResult<Vec<SimulationStep>> {
    let mut controller = PidController::new(*gains);
    let mut noise = NoiseSource::from_entropy();
    run_with(&mut controller, &mut noise, config, spec)
}

/// Run with a fresh controller and a seeded disturbance.
///
/// Identical inputs and seed give bit-identical samples.
pub fn run_seeded(
    gains: &PidGains,
    config: &SimulationConfig,
    spec: &ReferenceSpec,
    seed: u64,
) -> SimResult<Vec<SimulationStep>> {
    let mut controller = PidController::new(*gains);
    let mut noise = NoiseSource::seeded(seed);
    run_with(&mut controller, &mut noise, config, spec)
}

/// Run using caller-owned controller and noise source.
///
/// The controller is used as-is; call [`PidController::reset`] first unless
/// carrying state over from a previous run is intended. Nothing is computed
/// if validation fails.
pub fn run_with<R: Rng>(
    controller: &mut PidController,
    noise: &mut NoiseSource<R>,
    config: &SimulationConfig,
    spec: &ReferenceSpec,
) -> SimResult<Vec<SimulationStep>> {
    config.validate()?;
    spec.validate()?;

    let plant = FirstOrderPlant::new(config.plant_time_constant)?;
    let dt = config.dt;
    let n = intervals(config)?;

    debug!(
        reference = spec.kind(),
        duration = config.duration,
        dt,
        tau = config.plant_time_constant,
        noise_std_dev = config.noise_std_dev,
        samples = n + 1,
        "starting closed-loop run"
    );

    let mut plant_state = PlantState::default();
    let mut steps = Vec::with_capacity(n + 1);

    for i in 0..=n {
        let time = i as f64 * dt;
        let setpoint = reference(time, spec);
        let error = setpoint - plant_state.output;
        let control = controller.calculate(error, dt)?;
        let disturbance = noise.sample(config.noise_std_dev)?;
        plant_state = plant.step(&plant_state, dt, control + disturbance)?;

        steps.push(SimulationStep {
            time,
            reference: setpoint,
            output: plant_state.output,
            error,
            control,
        });
    }

    if let Some(last) = steps.last() {
        debug!(
            final_time = last.time,
            final_output = last.output,
            final_error = last.error,
            "closed-loop run finished"
        );
    }

    Ok(steps)
}
