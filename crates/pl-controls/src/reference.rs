//! Reference (setpoint) trajectories.
//!
//! A reference is a pure function of elapsed time. Three shapes are supported:
//! - **Constant**: a fixed setpoint
//! - **StepSequence**: piecewise-constant setpoint changes at listed times
//! - **Sine**: `offset + amplitude * sin(2π f t)`

use crate::error::{ControlError, ControlResult};
use pl_core::ensure_finite;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One entry of a step sequence: from `time` on, the setpoint is `value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepPoint {
    /// Activation time (seconds).
    pub time: f64,
    /// Setpoint value once active.
    pub value: f64,
}

impl StepPoint {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Reference trajectory shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReferenceSpec {
    Constant {
        value: f64,
    },
    /// Entries are evaluated in list order, never re-sorted.
    StepSequence {
        steps: Vec<StepPoint>,
    },
    Sine {
        amplitude: f64,
        frequency_hz: f64,
        offset: f64,
    },
}

impl ReferenceSpec {
    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    pub fn steps(steps: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::StepSequence {
            steps: steps
                .into_iter()
                .map(|(time, value)| StepPoint::new(time, value))
                .collect(),
        }
    }

    pub fn sine(amplitude: f64, frequency_hz: f64, offset: f64) -> Self {
        Self::Sine {
            amplitude,
            frequency_hz,
            offset,
        }
    }

    /// Short name of the shape, as used in scenario files.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "Constant",
            Self::StepSequence { .. } => "StepSequence",
            Self::Sine { .. } => "Sine",
        }
    }

    /// Check that the trajectory is well defined.
    ///
    /// # Errors
    ///
    /// `InvalidReference` for an empty step list, non-finite values, a negative
    /// sine amplitude or a non-positive sine frequency.
    pub fn validate(&self) -> ControlResult<()> {
        match self {
            Self::Constant { value } => finite(*value, "constant value must be finite"),
            Self::StepSequence { steps } => {
                if steps.is_empty() {
                    return Err(ControlError::InvalidReference {
                        what: "step sequence must not be empty",
                    });
                }
                for step in steps {
                    finite(step.time, "step time must be finite")?;
                    finite(step.value, "step value must be finite")?;
                }
                Ok(())
            }
            Self::Sine {
                amplitude,
                frequency_hz,
                offset,
            } => {
                finite(*amplitude, "sine amplitude must be finite")?;
                finite(*frequency_hz, "sine frequency must be finite")?;
                finite(*offset, "sine offset must be finite")?;
                if *amplitude < 0.0 {
                    return Err(ControlError::InvalidReference {
                        what: "sine amplitude must be non-negative",
                    });
                }
                if *frequency_hz <= 0.0 {
                    return Err(ControlError::InvalidReference {
                        what: "sine frequency must be positive",
                    });
                }
                Ok(())
            }
        }
    }

    /// Evaluate the setpoint at `time`. See [`reference`].
    pub fn at(&self, time: f64) -> f64 {
        reference(time, self)
    }
}

fn finite(v: f64, what: &'static str) -> ControlResult<()> {
    ensure_finite(v, what)
        .map(|_| ())
        .map_err(|_| ControlError::InvalidReference { what })
}

/// Setpoint value of `spec` at `time` (seconds).
///
/// For a step sequence the running value starts at the first entry's value and
/// is overwritten, in list order, by every entry whose time has been reached.
/// An empty sequence evaluates to 0; [`ReferenceSpec::validate`] rejects it.
pub fn reference(time: f64, spec: &ReferenceSpec) -> f64 {
    match spec {
        ReferenceSpec::Constant { value } => *value,
        ReferenceSpec::StepSequence { steps } => {
            let Some(first) = steps.first() else {
                return 0.0;
            };
            steps
                .iter()
                .filter(|step| time >= step.time)
                .fold(first.value, |_, step| step.value)
        }
        ReferenceSpec::Sine {
            amplitude,
            frequency_hz,
            offset,
        } => offset + amplitude * (2.0 * PI * frequency_hz * time).sin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ui_default_steps() -> ReferenceSpec {
        ReferenceSpec::steps([(0.0, 0.0), (2.0, 100.0), (5.0, 50.0)])
    }

    #[test]
    fn constant_is_constant() {
        let spec = ReferenceSpec::constant(42.0);
        assert_eq!(reference(0.0, &spec), 42.0);
        assert_eq!(reference(1e6, &spec), 42.0);
    }

    #[test]
    fn step_sequence_scan() {
        let spec = ui_default_steps();
        assert_eq!(reference(1.0, &spec), 0.0);
        assert_eq!(reference(2.0, &spec), 100.0);
        assert_eq!(reference(4.99, &spec), 100.0);
        assert_eq!(reference(5.0, &spec), 50.0);
        assert_eq!(reference(100.0, &spec), 50.0);
    }

    #[test]
    fn step_sequence_before_first_uses_first_value() {
        let spec = ReferenceSpec::steps([(1.0, 7.0), (3.0, 9.0)]);
        assert_eq!(reference(0.0, &spec), 7.0);
        assert_eq!(reference(-5.0, &spec), 7.0);
    }

    #[test]
    fn step_sequence_unsorted_is_scanned_in_list_order() {
        // (5, 50) is listed before (2, 100): once both have been reached the
        // later list entry wins even though its time is earlier.
        let spec = ReferenceSpec::steps([(0.0, 0.0), (5.0, 50.0), (2.0, 100.0)]);
        assert_eq!(reference(3.0, &spec), 100.0);
        assert_eq!(reference(6.0, &spec), 100.0);
    }

    #[test]
    fn step_sequence_tie_goes_to_later_entry() {
        let spec = ReferenceSpec::steps([(0.0, 0.0), (2.0, 10.0), (2.0, 20.0)]);
        assert_eq!(reference(2.0, &spec), 20.0);
    }

    #[test]
    fn sine_reference() {
        let spec = ReferenceSpec::sine(100.0, 0.1, 0.0);
        assert_eq!(reference(0.0, &spec), 0.0);
        assert!((reference(2.5, &spec) - 100.0).abs() < 1e-9);
        assert!((reference(7.5, &spec) + 100.0).abs() < 1e-9);

        let shifted = ReferenceSpec::sine(10.0, 1.0, 5.0);
        assert!((reference(0.0, &shifted) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn empty_steps_are_invalid() {
        let spec = ReferenceSpec::StepSequence { steps: vec![] };
        assert_eq!(reference(1.0, &spec), 0.0);
        assert!(matches!(
            spec.validate(),
            Err(ControlError::InvalidReference { .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_sine() {
        assert!(ReferenceSpec::sine(-1.0, 0.1, 0.0).validate().is_err());
        assert!(ReferenceSpec::sine(1.0, 0.0, 0.0).validate().is_err());
        assert!(ReferenceSpec::sine(1.0, f64::NAN, 0.0).validate().is_err());
        assert!(ReferenceSpec::sine(100.0, 0.1, 0.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite() {
        assert!(ReferenceSpec::constant(f64::INFINITY).validate().is_err());
        assert!(ReferenceSpec::steps([(f64::NAN, 1.0)]).validate().is_err());
        assert!(ui_default_steps().validate().is_ok());
    }

    proptest! {
        #[test]
        fn step_value_matches_last_reached_entry(
            entries in prop::collection::vec((0.0_f64..10.0, -100.0_f64..100.0), 1..8),
            t in -1.0_f64..12.0,
        ) {
            let spec = ReferenceSpec::steps(entries.clone());
            let expected = entries
                .iter()
                .rev()
                .find(|(time, _)| t >= *time)
                .map(|(_, value)| *value)
                .unwrap_or(entries[0].1);
            prop_assert_eq!(reference(t, &spec), expected);
        }

        #[test]
        fn sine_stays_within_band(
            amplitude in 0.0_f64..200.0,
            freq in 0.01_f64..1.0,
            offset in -100.0_f64..100.0,
            t in 0.0_f64..100.0,
        ) {
            let r = reference(t, &ReferenceSpec::sine(amplitude, freq, offset));
            prop_assert!(r <= offset + amplitude + 1e-9);
            prop_assert!(r >= offset - amplitude - 1e-9);
        }
    }
}
