use thiserror::Error;

use crate::domain::{ModelError, SolverError};
use crate::infrastructure::LoadError;

/// Any failure along the load → build → solve pipeline
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Invalid model: {0}")]
    Model(#[from] ModelError),

    #[error("Solver failed: {0}")]
    Solver(#[from] SolverError),
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;
