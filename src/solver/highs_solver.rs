// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// Translates the reserve model into a HiGHS row problem

use highs::{Col, HighsModelStatus, RowProblem, Sense};
use std::time::Instant;
use tracing::{debug, warn};

use super::incumbent::accept_solution;
use super::linearize::pair_terms;
use crate::domain::{
    models::{ReserveModel, ReserveSolution, SolverConfig, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolutionStatus,
};

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, model: &ReserveModel, config: &SolverConfig) -> Result<ReserveSolution> {
        // Validate first
        self.validate(model)?;

        let start_time = Instant::now();
        let num_units = model.num_units();
        let pairs = pair_terms(model);

        let mut pb = RowProblem::default();

        // One binary column per planning unit; locks fix the bounds
        let x: Vec<Col> = (0..num_units)
            .map(|i| {
                let (lower, upper) = model.variable_bounds(i);
                pb.add_integer_column(model.obj[i], lower..=upper)
            })
            .collect();

        // Boundary products become continuous columns linked to their units
        for pair in &pairs {
            let y = pb.add_column(pair.coefficient, 0.0..=1.0);
            pb.add_row(..=0.0, [(y, 1.0), (x[pair.i], -1.0)]);
            pb.add_row(..=0.0, [(y, 1.0), (x[pair.j], -1.0)]);
            if pair.needs_lower_link() {
                pb.add_row(-1.0.., [(y, 1.0), (x[pair.i], -1.0), (x[pair.j], -1.0)]);
            }
        }

        // Representation constraints
        let rows = model.constraint_rows();
        for (f, &target) in model.rhs.iter().enumerate() {
            let terms: Vec<(Col, f64)> = rows.row(f).map(|(i, v)| (x[i], v)).collect();
            pb.add_row(target.., &terms);
        }

        let num_constraints = pb.num_rows();
        debug!(
            columns = pb.num_cols(),
            rows = num_constraints,
            auxiliary = pairs.len(),
            "Built HiGHS problem"
        );

        let mut highs_model = pb.optimise(Sense::Minimise);
        if !config.verbose {
            highs_model.make_quiet();
        }
        if let Some(limit) = config.time_limit {
            highs_model.set_option("time_limit", limit);
            if config.gap.is_some() {
                warn!("Time limit set; ignoring optimality gap");
            }
        }
        if let Some(gap) = config.effective_gap() {
            highs_model.set_option("mip_rel_gap", gap);
        }

        let solved = highs_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;

        // Build statistics
        let statistics = SolverStatistics {
            solve_time_ms: solve_time,
            num_variables: (num_units + pairs.len()) as u32,
            num_constraints: num_constraints as u32,
            num_binary_vars: num_units as u32,
            num_auxiliary_vars: pairs.len() as u32,
        };

        // Process result
        let status = solved.status();
        let status = match status {
            HighsModelStatus::Optimal => SolutionStatus::Optimal,
            HighsModelStatus::ReachedTimeLimit => SolutionStatus::TimeLimit,
            HighsModelStatus::Infeasible => return Err(SolverError::Infeasible),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                return Err(SolverError::Unbounded)
            }
            status => {
                return Err(SolverError::ExecutionFailed(format!(
                    "HiGHS solver returned status: {:?}",
                    status
                )))
            }
        };

        let values = solved.get_solution().columns().to_vec();
        let objective = solved.objective_value();
        let gap = solved.mip_gap();
        let bound = if gap.is_finite() {
            Some(objective - gap * objective.abs())
        } else if status == SolutionStatus::Optimal {
            Some(objective)
        } else {
            None
        };

        let solution = accept_solution(model, status, &values, bound)?;

        Ok(solution
            .with_message(format!("{} reserve selection from HiGHS", status))
            .with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
