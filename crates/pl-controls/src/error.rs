//! Error types for control system operations.

use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control system operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// A per-call numeric precondition was violated (e.g. zero time step).
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    /// A reference trajectory definition is unusable.
    #[error("Invalid reference: {what}")]
    InvalidReference { what: &'static str },
}

