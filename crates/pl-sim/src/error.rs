//! Error types for simulation operations.

use pl_controls::ControlError;
use thiserror::Error;

/// Errors encountered while setting up or stepping a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Top-level configuration rejected before any step was taken.
    #[error("Configuration error: {what}")]
    Config { what: &'static str },

    /// A per-step numeric precondition was violated.
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<ControlError> for SimError {
    fn from(e: ControlError) -> Self {
        match e {
            ControlError::InvalidParameter { what } => SimError::InvalidParameter { what },
            ControlError::InvalidReference { what } => SimError::Config { what },
        }
    }
}
