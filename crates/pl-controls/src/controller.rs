//! Discrete PID controller.
//!
//! The control law is the textbook parallel form evaluated once per sample:
//!
//! ```text
//! u = kp * e + ki * sum(e * dt) + kd * (e - e_prev) / dt
//! ```
//!
//! There is no anti-windup, output clamping or derivative filtering. The
//! derivative acts on the error, so a setpoint jump produces a one-sample kick.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};

/// PID gains. Conventionally non-negative, but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (per second).
    pub ki: f64,
    /// Derivative gain (seconds).
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// Compute one controller update from `state` without mutating it.
    ///
    /// # Arguments
    ///
    /// * `state` - Controller memory from the previous sample
    /// * `error` - Tracking error (setpoint minus measurement)
    /// * `dt` - Time since last update (seconds)
    ///
    /// # Returns
    ///
    /// Updated state and control output.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `dt` is not strictly positive.
    pub fn update(&self, state: &PidState, error: f64, dt: f64) -> ControlResult<(PidState, f64)> {
        if dt.is_nan() || dt <= 0.0 {
            return Err(ControlError::InvalidParameter {
                what: "controller dt must be positive",
            });
        }

        let p_term = self.kp * error;

        let integral = state.integral + error * dt;
        let i_term = self.ki * integral;

        // Derivative uses the error from the previous call.
        let d_term = self.kd * (error - state.previous_error) / dt;

        let new_state = PidState {
            integral,
            previous_error: error,
        };

        Ok((new_state, p_term + i_term + d_term))
    }
}

/// PID controller memory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidState {
    /// Integral accumulator (error * seconds).
    pub integral: f64,
    /// Error seen on the previous call.
    pub previous_error: f64,
}

/// Stateful PID controller: gains plus the memory they act on.
///
/// # Example
///
/// ```
/// use pl_controls::{PidController, PidGains};
///
/// let mut pid = PidController::new(PidGains::new(0.0, 0.0, 1.0));
/// assert_eq!(pid.calculate(5.0, 1.0).unwrap(), 5.0);
/// assert_eq!(pid.calculate(8.0, 1.0).unwrap(), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PidController {
    gains: PidGains,
    state: PidState,
}

impl PidController {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            state: PidState::default(),
        }
    }

    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    pub fn state(&self) -> &PidState {
        &self.state
    }

    /// Compute the control signal for `error` and advance the controller memory.
    ///
    /// On error the memory is left untouched.
    pub fn calculate(&mut self, error: f64, dt: f64) -> ControlResult<f64> {
        let (state, output) = self.gains.update(&self.state, error, dt)?;
        self.state = state;
        Ok(output)
    }

    /// Zero the integral and previous error.
    pub fn reset(&mut self) {
        self.state = PidState::default();
    }
}
