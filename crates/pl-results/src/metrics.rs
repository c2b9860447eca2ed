//! Control loop performance metrics.
//!
//! Computes rise time, settling time, overshoot and final offset from the
//! recorded output of a run. The response is measured relative to the value the
//! output ends at, so the metrics describe the last transient that settled.

use pl_sim::SimulationStep;
use serde::{Deserialize, Serialize};

/// Changes smaller than this are treated as "no response".
const MIN_CHANGE: f64 = 1e-6;

/// Standard control loop performance metrics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LoopMetrics {
    /// Time for output to reach 10% of its total change (seconds)
    pub rise_time_10_s: Option<f64>,
    /// Time for output to reach 90% of its total change (seconds)
    pub rise_time_90_s: Option<f64>,
    /// Time for output to enter the ±2% band around its final value and stay there (seconds)
    pub settling_time_2pct_s: Option<f64>,
    /// Peak excursion past the final value, in the direction of travel, as a
    /// percent of |final value|
    pub overshoot_pct: Option<f64>,
    /// Final output minus final reference
    pub final_offset: Option<f64>,
    /// Largest control signal witnessed
    pub max_control: Option<f64>,
}

impl LoopMetrics {
    /// Returns true if the response produced any transient metric.
    pub fn has_response(&self) -> bool {
        self.rise_time_10_s.is_some()
            || self.rise_time_90_s.is_some()
            || self.settling_time_2pct_s.is_some()
            || self.overshoot_pct.is_some()
    }
}

/// Compute metrics for a run. An empty run yields all-`None` metrics.
pub fn compute_loop_metrics(steps: &[SimulationStep]) -> LoopMetrics {
    let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
        return LoopMetrics::default();
    };

    let output: Vec<(f64, f64)> = steps.iter().map(|s| (s.time, s.output)).collect();

    let mut metrics = LoopMetrics {
        final_offset: Some(last.output - last.reference),
        max_control: steps
            .iter()
            .map(|s| s.control)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)),
        ..LoopMetrics::default()
    };

    // The initial value is the output before the first update, which is always 0.
    let initial = 0.0;
    let final_val = last.output;
    let output_change = (final_val - initial).abs();
    let reference_change = (last.reference - first.reference).abs();

    if (output_change > MIN_CHANGE || reference_change > MIN_CHANGE) && final_val.abs() > MIN_CHANGE
    {
        metrics.rise_time_10_s = time_to_fraction(&output, initial, final_val, 0.1);
        metrics.rise_time_90_s = time_to_fraction(&output, initial, final_val, 0.9);

        // Overshoot is measured past the final value in the direction of travel.
        let values = output.iter().map(|(_, v)| *v);
        let beyond = if final_val >= initial {
            values.fold(f64::NEG_INFINITY, f64::max) - final_val
        } else {
            final_val - values.fold(f64::INFINITY, f64::min)
        };
        let overshoot = beyond / final_val.abs() * 100.0;
        if overshoot > 0.0 {
            metrics.overshoot_pct = Some(overshoot);
        }

        metrics.settling_time_2pct_s = settling_time(&output, final_val, 0.02);
    }

    metrics
}

/// Time at which the series first reaches `initial + fraction * (final - initial)`,
/// linearly interpolated between samples.
fn time_to_fraction(series: &[(f64, f64)], initial: f64, final_val: f64, fraction: f64) -> Option<f64> {
    let change = final_val - initial;
    if change.abs() < 1e-9 {
        return None;
    }
    let target = initial + fraction * change;
    let rising = change > 0.0;

    let mut prev: Option<(f64, f64)> = None;
    for &(time, val) in series {
        let reached = if rising { val >= target } else { val <= target };
        if reached {
            return match prev {
                Some((prev_time, prev_val)) if (val - prev_val).abs() > 1e-9 => {
                    let frac = (target - prev_val) / (val - prev_val);
                    Some(prev_time + frac * (time - prev_time))
                }
                _ => Some(time),
            };
        }
        prev = Some((time, val));
    }
    None
}

/// Time at which the series enters the open band `final_val * (1 ± tolerance)`
/// for the last time.
fn settling_time(series: &[(f64, f64)], final_val: f64, tolerance: f64) -> Option<f64> {
    if final_val.abs() < 1e-9 {
        return None;
    }
    let half_width = final_val.abs() * tolerance;
    let (lower, upper) = (final_val - half_width, final_val + half_width);

    let mut entry: Option<f64> = None;
    for &(time, val) in series {
        let in_band = val > lower && val < upper;
        match (entry, in_band) {
            (None, true) => entry = Some(time),
            (Some(_), false) => entry = None,
            _ => {}
        }
    }
    entry
}
