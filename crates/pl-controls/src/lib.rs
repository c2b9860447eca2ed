//! Controller and setpoint primitives for pidlab.
//!
//! This crate holds the signal side of the closed loop:
//! - a discrete PID controller carrying its integral and previous error
//! - reference (setpoint) trajectories: constant, step sequence and sine
//!
//! Both are plain data plus functions. The plant, the disturbance model and the
//! time-stepping loop live in `pl-sim`.

pub mod controller;
pub mod error;
pub mod reference;

pub use controller::{PidController, PidGains, PidState};
pub use error::{ControlError, ControlResult};
pub use reference::{ReferenceSpec, StepPoint, reference};
