//! pl-results: post-processing and export of closed-loop runs.

pub mod error;
pub mod export;
pub mod metrics;
pub mod summary;

pub use error::{ResultsError, ResultsResult};
pub use export::{RunRecord, load_record, save_csv, save_record, write_csv};
pub use metrics::{LoopMetrics, compute_loop_metrics};
pub use summary::RunSummary;
