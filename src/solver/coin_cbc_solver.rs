use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolutionStatus as GoodLpStatus, SolverModel,
    Variable as GoodLpVariable,
};
use std::time::Instant;
use tracing::{debug, warn};

use super::incumbent::accept_solution;
use super::linearize::pair_terms;
use crate::domain::{
    models::{ReserveModel, ReserveSolution, SolverConfig, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolutionStatus,
};

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, model: &ReserveModel, config: &SolverConfig) -> Result<ReserveSolution> {
        // Validate first
        self.validate(model)?;

        let start_time = Instant::now();
        let num_units = model.num_units();
        let pairs = pair_terms(model);

        // Build variables using good_lp
        let mut vars = variables!();
        let x: Vec<GoodLpVariable> = (0..num_units)
            .map(|i| {
                let (lower, upper) = model.variable_bounds(i);
                vars.add(variable().binary().min(lower).max(upper))
            })
            .collect();
        let y: Vec<GoodLpVariable> = pairs
            .iter()
            .map(|_| vars.add(variable().min(0.0).max(1.0)))
            .collect();

        // Build objective expression
        let mut obj_expr: Expression = 0.into();
        for (i, &coeff) in model.obj.iter().enumerate() {
            if coeff != 0.0 {
                obj_expr += coeff * x[i];
            }
        }
        for (pair, &aux) in pairs.iter().zip(&y) {
            obj_expr += pair.coefficient * aux;
        }

        let mut lp_model = vars.minimise(obj_expr).using(coin_cbc::coin_cbc);
        lp_model.set_parameter("log", if config.verbose { "1" } else { "0" });
        if let Some(limit) = config.time_limit {
            lp_model.set_parameter("seconds", &limit.to_string());
            if config.gap.is_some() {
                warn!("Time limit set; ignoring optimality gap");
            }
        }
        if let Some(gap) = config.effective_gap() {
            lp_model.set_parameter("ratioGap", &gap.to_string());
        }

        // Boundary products
        let mut num_constraints = 0usize;
        for (pair, &aux) in pairs.iter().zip(&y) {
            lp_model = lp_model.with((aux - x[pair.i]).leq(0.0));
            lp_model = lp_model.with((aux - x[pair.j]).leq(0.0));
            num_constraints += 2;
            if pair.needs_lower_link() {
                lp_model = lp_model.with((aux - x[pair.i] - x[pair.j]).geq(-1.0));
                num_constraints += 1;
            }
        }

        // Representation constraints
        let rows = model.constraint_rows();
        for (f, &target) in model.rhs.iter().enumerate() {
            let mut lhs: Expression = 0.into();
            for (i, coeff) in rows.row(f) {
                lhs += coeff * x[i];
            }
            lp_model = lp_model.with(lhs.geq(target));
            num_constraints += 1;
        }

        debug!(
            columns = num_units + pairs.len(),
            rows = num_constraints,
            auxiliary = pairs.len(),
            "Built CBC problem"
        );

        // Solve the problem
        let solution_result = lp_model.solve();
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
        match solution_result {
            Ok(sol) => {
                let values: Vec<f64> = x.iter().map(|&var| sol.value(var)).collect();
                let status = match sol.status() {
                    GoodLpStatus::Optimal => SolutionStatus::Optimal,
                    GoodLpStatus::GapLimit => SolutionStatus::GapLimit,
                    GoodLpStatus::TimeLimit => SolutionStatus::TimeLimit,
                };
                let bound = sol.model().best_possible_value();
                debug!(%status, bound, "CBC finished");

                let solution = accept_solution(model, status, &values, Some(bound))?;

                Ok(solution
                    .with_message(format!("{} reserve selection from COIN-OR CBC", status))
                    .with_statistics(statistics))
            }
            Err(ResolutionError::Infeasible) => Err(SolverError::Infeasible),
            Err(ResolutionError::Unbounded) => Err(SolverError::Unbounded),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
