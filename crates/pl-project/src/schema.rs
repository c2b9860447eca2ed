//! Scenario schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub pid: PidDef,
    #[serde(default)]
    pub simulation: SimulationDef,
    #[serde(default)]
    pub reference: ReferenceDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            version: crate::validate::LATEST_VERSION,
            name: "Step response".to_string(),
            pid: PidDef::default(),
            simulation: SimulationDef::default(),
            reference: ReferenceDef::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PidDef {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for PidDef {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.5,
            kd: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    #[serde(default = "default_duration")]
    pub duration_s: f64,
    #[serde(default = "default_dt")]
    pub dt_s: f64,
    #[serde(default = "default_plant_tau")]
    pub plant_tau_s: f64,
    #[serde(default)]
    pub noise_std_dev: f64,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            duration_s: default_duration(),
            dt_s: default_dt(),
            plant_tau_s: default_plant_tau(),
            noise_std_dev: 0.0,
        }
    }
}

fn default_duration() -> f64 {
    10.0
}

fn default_dt() -> f64 {
    0.01
}

fn default_plant_tau() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ReferenceDef {
    Constant {
        #[serde(default)]
        value: f64,
    },
    StepSequence {
        #[serde(default = "default_steps")]
        steps: Vec<StepDef>,
    },
    Sine {
        #[serde(default = "default_sine_amplitude")]
        amplitude: f64,
        #[serde(default = "default_sine_frequency")]
        frequency_hz: f64,
        #[serde(default)]
        offset: f64,
    },
    /// Any `type` tag not listed above.
    #[serde(other)]
    Unknown,
}

impl Default for ReferenceDef {
    fn default() -> Self {
        Self::StepSequence {
            steps: vec![
                StepDef {
                    time_s: 0.0,
                    value: 0.0,
                },
                StepDef {
                    time_s: 2.0,
                    value: 100.0,
                },
                StepDef {
                    time_s: 5.0,
                    value: 50.0,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StepDef {
    pub time_s: f64,
    pub value: f64,
}

fn default_steps() -> Vec<StepDef> {
    vec![StepDef {
        time_s: 0.0,
        value: 0.0,
    }]
}

fn default_sine_amplitude() -> f64 {
    100.0
}

fn default_sine_frequency() -> f64 {
    0.1
}
