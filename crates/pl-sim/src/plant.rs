//! First-order lag plant.
//!
//! Dynamics: `dy/dt = (u - y) / tau`, integrated with one explicit Euler step
//! per sample. The unit DC gain means a constant input `u` is approached with
//! time constant `tau`.

use crate::error::{SimError, SimResult};

/// Single explicit Euler step of the first-order lag.
///
/// ```text
/// y_next = y + dt * (u - y) / tau
/// ```
///
/// # Errors
///
/// `InvalidParameter` if `tau` or `dt` is not strictly positive.
pub fn advance(current_output: f64, control_input: f64, tau: f64, dt: f64) -> SimResult<f64> {
    if tau.is_nan() || tau <= 0.0 {
        return Err(SimError::InvalidParameter {
            what: "plant tau must be positive",
        });
    }
    if dt.is_nan() || dt <= 0.0 {
        return Err(SimError::InvalidParameter {
            what: "plant dt must be positive",
        });
    }
    Ok(current_output + dt * ((control_input - current_output) / tau))
}

/// State of the plant (its output).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlantState {
    pub output: f64,
}

/// First-order lag with a validated time constant.
///
/// # Example
///
/// ```
/// use pl_sim::{FirstOrderPlant, PlantState};
///
/// let plant = FirstOrderPlant::new(1.0).unwrap();
/// let mut state = PlantState::default();
/// for _ in 0..1000 {
///     state = plant.step(&state, 0.01, 1.0).unwrap();
/// }
/// assert!(state.output > 0.99);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FirstOrderPlant {
    /// Time constant (seconds), must be positive
    pub tau: f64,
}

impl FirstOrderPlant {
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `tau` is not positive.
    pub fn new(tau: f64) -> SimResult<Self> {
        if tau.is_nan() || tau <= 0.0 {
            return Err(SimError::InvalidParameter {
                what: "plant tau must be positive",
            });
        }
        Ok(Self { tau })
    }

    /// Output derivative for the given output and input.
    pub fn dydt(&self, output: f64, input: f64) -> f64 {
        (input - output) / self.tau
    }

    /// Advance `state` by `dt` under constant `input`.
    pub fn step(&self, state: &PlantState, dt: f64, input: f64) -> SimResult<PlantState> {
        Ok(PlantState {
            output: advance(state.output, input, self.tau, dt)?,
        })
    }
}
