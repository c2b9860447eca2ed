use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Project(#[from] pl_project::ProjectError),

    #[error(transparent)]
    Results(#[from] pl_results::ResultsError),

    #[error(transparent)]
    Sim(#[from] pl_sim::SimError),

    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyExists { path: String },
}
