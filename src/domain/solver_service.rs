// Domain service interface for solving reserve-selection problems
// Defines the contract that any solver backend must follow

use super::models::{ReserveModel, ReserveSolution, SolverConfig};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Problem is infeasible: no selection meets every target")]
    Infeasible,

    #[error("Problem is unbounded")]
    Unbounded,

    #[error("Time limit reached before a feasible selection was found")]
    NoSolutionWithinTimeLimit,

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for reserve-selection solvers
///
/// Backends receive the assembled coefficients and hand back a normalised
/// selection. Branch-and-bound and everything below it is the backend's job.
pub trait SolverService: Send + Sync {
    /// Solve a reserve model
    fn solve(&self, model: &ReserveModel, config: &SolverConfig) -> Result<ReserveSolution>;

    /// Validate a model without solving it
    fn validate(&self, model: &ReserveModel) -> Result<()> {
        let mut errors = Vec::new();
        let num_units = model.num_units();

        if num_units == 0 {
            errors.push("Model has no planning units".to_string());
        }
        if model.q.nrows() != num_units || model.q.ncols() != num_units {
            errors.push(format!(
                "Quadratic matrix is {}x{} but model has {} units",
                model.q.nrows(),
                model.q.ncols(),
                num_units
            ));
        }
        if model.a.ncols() != num_units {
            errors.push(format!(
                "Constraint matrix has {} columns but model has {} units",
                model.a.ncols(),
                num_units
            ));
        }
        if model.a.nrows() != model.rhs.len() || model.sense.len() != model.rhs.len() {
            errors.push(format!(
                "Constraint matrix has {} rows, {} right-hand sides and {} senses",
                model.a.nrows(),
                model.rhs.len(),
                model.sense.len()
            ));
        }
        if model.vtype.len() != num_units || model.locks.len() != num_units {
            errors.push(format!(
                "Expected {} variable types and locks, got {} and {}",
                num_units,
                model.vtype.len(),
                model.locks.len()
            ));
        }
        if model
            .q
            .triplets()
            .iter()
            .any(|t| t.row == t.col && t.value != 0.0)
        {
            errors.push("Quadratic matrix must have an empty diagonal".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}
