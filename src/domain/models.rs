use super::error::{ModelError, ModelResult};
use super::sparse::{CsrMatrix, SparseMatrix};
use super::value_objects::{
    ConstraintSense, LockStatus, SolutionStatus, SolverBackend, VariableType,
};

/// Absolute slack allowed on a representation constraint when judging a selection
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Bounds at or beyond this magnitude mean the backend has no bound
pub const UNBOUNDED_OBJECTIVE: f64 = 1e30;

/// Coefficient structures of a reserve-selection program
///
/// minimise `objᵀx + xᵀQx` subject to `A x (sense) rhs`, `x` of type `vtype`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReserveModel {
    pub obj: Vec<f64>,
    /// Units × units; both `(i, j)` and `(j, i)` are stored, no diagonal
    pub q: SparseMatrix,
    /// Features × units
    pub a: SparseMatrix,
    pub rhs: Vec<f64>,
    pub sense: Vec<ConstraintSense>,
    pub vtype: Vec<VariableType>,
    pub locks: Vec<LockStatus>,
}

impl ReserveModel {
    pub fn num_units(&self) -> usize {
        self.obj.len()
    }

    pub fn num_features(&self) -> usize {
        self.rhs.len()
    }

    pub fn is_quadratic(&self) -> bool {
        !self.q.is_empty()
    }

    /// Lower and upper bound of unit `i`'s selection variable
    pub fn variable_bounds(&self, i: usize) -> (f64, f64) {
        self.locks.get(i).copied().unwrap_or_default().bounds()
    }

    /// Objective `objᵀx + xᵀQx` at `x`.
    pub fn evaluate(&self, x: &[f64]) -> ModelResult<f64> {
        self.check_len(x)?;
        let linear: f64 = self.obj.iter().zip(x).map(|(c, v)| c * v).sum();
        let quadratic = if self.is_quadratic() {
            self.q.to_csr().quadratic_form(x)?
        } else {
            0.0
        };
        Ok(linear + quadratic)
    }

    /// Amount of each feature held by `x`, i.e. `A x`.
    pub fn representation(&self, x: &[f64]) -> ModelResult<Vec<f64>> {
        self.check_len(x)?;
        self.a.to_csr().mul_vec(x)
    }

    /// Whether `x` satisfies every representation constraint within `tolerance`.
    pub fn is_feasible(&self, x: &[f64], tolerance: f64) -> ModelResult<bool> {
        let held = self.representation(x)?;
        Ok(held
            .iter()
            .zip(&self.rhs)
            .zip(&self.sense)
            .all(|((&lhs, &rhs), sense)| match sense {
                ConstraintSense::GreaterThanOrEqual => lhs >= rhs - tolerance,
            }))
    }

    pub fn constraint_rows(&self) -> CsrMatrix {
        self.a.to_csr()
    }

    fn check_len(&self, x: &[f64]) -> ModelResult<()> {
        if x.len() != self.num_units() {
            return Err(ModelError::DimensionMismatch {
                what: "selection".to_string(),
                expected: self.num_units(),
                actual: x.len(),
            });
        }
        Ok(())
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Time limit in seconds; when set the gap is ignored
    pub time_limit: Option<f64>,
    /// Relative optimality gap
    pub gap: Option<f64>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap: None,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Gap actually passed to the solver: none while a time limit is set.
    pub fn effective_gap(&self) -> Option<f64> {
        match self.time_limit {
            Some(_) => None,
            None => self.gap,
        }
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_binary_vars: u32,
    /// Continuous variables added to linearise boundary products
    pub num_auxiliary_vars: u32,
}

/// Solution to a reserve-selection problem
#[derive(Debug, Clone, PartialEq)]
pub struct ReserveSolution {
    pub status: SolutionStatus,
    /// One flag per planning unit
    pub selection: Vec<bool>,
    pub selected_units: Vec<usize>,
    pub objective_value: f64,
    pub objective_bound: Option<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl ReserveSolution {
    /// Round raw solver values and re-evaluate the objective on the rounded selection.
    pub fn from_values(
        model: &ReserveModel,
        status: SolutionStatus,
        values: &[f64],
        objective_bound: Option<f64>,
    ) -> ModelResult<Self> {
        if values.len() < model.num_units() {
            return Err(ModelError::DimensionMismatch {
                what: "solver values".to_string(),
                expected: model.num_units(),
                actual: values.len(),
            });
        }
        let selection: Vec<bool> = values[..model.num_units()].iter().map(|&v| v > 0.5).collect();
        let selected_units = selection
            .iter()
            .enumerate()
            .filter(|(_, s)| **s)
            .map(|(i, _)| i)
            .collect();
        let objective_value = model.evaluate(&as_values(&selection))?;
        // A lower bound never exceeds the objective it bounds
        let objective_bound = objective_bound
            .filter(|b| b.is_finite() && b.abs() < UNBOUNDED_OBJECTIVE)
            .map(|b| b.min(objective_value));

        Ok(Self {
            status,
            selection,
            selected_units,
            objective_value,
            objective_bound,
            message: String::new(),
            statistics: SolverStatistics::default(),
        })
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn num_selected(&self) -> usize {
        self.selected_units.len()
    }

    /// Selection as a 0/1 vector
    pub fn values(&self) -> Vec<f64> {
        as_values(&self.selection)
    }

    /// Relative gap between objective and bound, when a bound is known
    pub fn gap(&self) -> Option<f64> {
        let bound = self.objective_bound?;
        let denom = self.objective_value.abs().max(1e-10);
        Some(((self.objective_value - bound) / denom).max(0.0))
    }
}

pub(crate) fn as_values(selection: &[bool]) -> Vec<f64> {
    selection.iter().map(|&s| if s { 1.0 } else { 0.0 }).collect()
}
