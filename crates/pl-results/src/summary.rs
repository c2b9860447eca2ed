//! Headline statistics shown next to a run's chart.

use pl_sim::SimulationStep;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub max_output: f64,
    pub final_output: f64,
    /// Magnitude of the last sample's error.
    pub steady_state_error: f64,
    pub mean_abs_error: f64,
    pub data_points: usize,
    /// Time of the last sample (seconds).
    pub sim_time_s: f64,
}

impl RunSummary {
    /// Returns `None` for an empty run.
    pub fn from_steps(steps: &[SimulationStep]) -> Option<Self> {
        let last = steps.last()?;
        let max_output = steps
            .iter()
            .map(|s| s.output)
            .fold(f64::NEG_INFINITY, f64::max);
        let mean_abs_error =
            steps.iter().map(|s| s.error.abs()).sum::<f64>() / steps.len() as f64;

        Some(Self {
            max_output,
            final_output: last.output,
            steady_state_error: last.error.abs(),
            mean_abs_error,
            data_points: steps.len(),
            sim_time_s: last.time,
        })
    }
}
