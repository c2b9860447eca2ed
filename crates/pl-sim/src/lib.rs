//! Closed-loop time simulation for pidlab.
//!
//! Provides:
//! - First-order lag plant with explicit Euler stepping
//! - Seedable Gaussian disturbance source (Box-Muller over ChaCha8)
//! - Fixed-step driver composing reference, PID, noise and plant

pub mod error;
pub mod noise;
pub mod plant;
pub mod sim;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use noise::NoiseSource;
pub use plant::{FirstOrderPlant, PlantState, advance};
pub use sim::{
    MAX_SAMPLES, SimulationConfig, SimulationStep, run, run_seeded, run_with, step_count,
};

pub use pl_controls::{PidController, PidGains, ReferenceSpec, StepPoint};
