//! CSV and JSON export of run samples.

use std::io::Write;
use std::path::Path;

use pl_sim::SimulationStep;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ResultsError, ResultsResult};
use crate::summary::RunSummary;

pub const CSV_HEADER: &str = "time_s,reference,output,error,control";

/// Write `steps` as CSV with a header row.
pub fn write_csv<W: Write>(mut writer: W, steps: &[SimulationStep]) -> ResultsResult<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for s in steps {
        writeln!(
            writer,
            "{},{},{},{},{}",
            s.time, s.reference, s.output, s.error, s.control
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_csv(path: &Path, steps: &[SimulationStep]) -> ResultsResult<()> {
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), steps)?;
    info!(path = %path.display(), samples = steps.len(), "wrote CSV");
    Ok(())
}

/// A completed run with enough context to be re-plotted later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub scenario_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub summary: RunSummary,
    pub steps: Vec<SimulationStep>,
}

impl RunRecord {
    /// # Errors
    ///
    /// `Empty` if `steps` is empty.
    pub fn new(
        scenario_name: impl Into<String>,
        seed: Option<u64>,
        steps: Vec<SimulationStep>,
    ) -> ResultsResult<Self> {
        let summary = RunSummary::from_steps(&steps).ok_or(ResultsError::Empty)?;
        Ok(Self {
            scenario_name: scenario_name.into(),
            seed,
            summary,
            steps,
        })
    }
}

pub fn save_record(path: &Path, record: &RunRecord) -> ResultsResult<()> {
    let content = serde_json::to_string_pretty(record)?;
    std::fs::write(path, content)?;
    info!(path = %path.display(), samples = record.steps.len(), "wrote run record");
    Ok(())
}

pub fn load_record(path: &Path) -> ResultsResult<RunRecord> {
    let content = std::fs::read_to_string(path)?;
    let record: RunRecord = serde_json::from_str(&content)?;
    if record.steps.is_empty() {
        return Err(ResultsError::Empty);
    }
    Ok(record)
}
