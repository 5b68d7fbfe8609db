use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::error::PlanResult;
use crate::domain::{
    BoundaryMatrix, ModelBuilder, PlanningGrid, ReserveModel, ReserveSolution, ReserveSummary,
    SolverConfig, SolverService, TargetSpec,
};

/// Everything needed to select one reserve
#[derive(Debug, Clone)]
pub struct PlanningProblem {
    pub grid: PlanningGrid,
    /// One cost per unit, row-major
    pub costs: Vec<f64>,
    /// features × units
    pub occupancy: Vec<Vec<f64>>,
    /// Boundary lengths read from a table; derived from the grid when absent
    pub boundary: Option<BoundaryMatrix>,
    pub boundary_weight: f64,
    pub edge_factor: f64,
    pub targets: TargetSpec,
    pub locked_in: Vec<usize>,
    pub locked_out: Vec<usize>,
    pub solver_config: SolverConfig,
}

impl PlanningProblem {
    /// Problem on `grid` with percent targets, no boundary penalty and default solver settings.
    pub fn new(grid: PlanningGrid, costs: Vec<f64>, occupancy: Vec<Vec<f64>>, targets: TargetSpec) -> Self {
        Self {
            grid,
            costs,
            occupancy,
            boundary: None,
            boundary_weight: 0.0,
            edge_factor: 1.0,
            targets,
            locked_in: Vec::new(),
            locked_out: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_boundary_weight(mut self, weight: f64) -> Self {
        self.boundary_weight = weight;
        self
    }

    pub fn with_edge_factor(mut self, edge_factor: f64) -> Self {
        self.edge_factor = edge_factor;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryMatrix) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }
}

/// Result of a completed plan
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub boundary: BoundaryMatrix,
    pub model: ReserveModel,
    pub solution: ReserveSolution,
    pub summary: ReserveSummary,
}

/// Runs boundary calculation, model assembly and the solve against one backend
pub struct ReservePlanner {
    solver: Arc<dyn SolverService>,
}

impl ReservePlanner {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self { solver }
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Boundary table of the problem, or the grid's own when none was given.
    pub fn boundaries(problem: &PlanningProblem) -> BoundaryMatrix {
        match &problem.boundary {
            Some(boundary) => boundary.clone(),
            None => BoundaryMatrix::from_grid(&problem.grid),
        }
    }

    pub fn build_model(problem: &PlanningProblem, boundary: &BoundaryMatrix) -> PlanResult<ReserveModel> {
        let model = ModelBuilder::new(&problem.costs, &problem.occupancy)
            .with_boundary(boundary)
            .with_boundary_weight(problem.boundary_weight)
            .with_edge_factor(problem.edge_factor)
            .with_targets(problem.targets.clone())
            .with_locked_in(problem.locked_in.clone())
            .with_locked_out(problem.locked_out.clone())
            .build()?;
        Ok(model)
    }

    pub fn plan(&self, problem: &PlanningProblem) -> PlanResult<PlanOutcome> {
        info!(
            units = problem.grid.num_units(),
            features = problem.occupancy.len(),
            nrows = problem.grid.nrows,
            ncols = problem.grid.ncols,
            "Planning reserve"
        );

        let boundary = Self::boundaries(problem);
        debug!(
            shared_edges = boundary.shared_entries().count(),
            "Boundary lengths ready"
        );

        let model = Self::build_model(problem, &boundary)?;
        info!(
            quadratic_terms = model.q.nnz(),
            constraints = model.rhs.len(),
            "Model assembled"
        );

        info!("Solving with {}", self.solver.name());
        let start = Instant::now();
        let solution = self.solver.solve(&model, &problem.solver_config)?;
        info!(
            status = %solution.status,
            selected = solution.num_selected(),
            objective = solution.objective_value,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Solve finished"
        );

        let summary = ReserveSummary::new(
            &model,
            &problem.costs,
            &boundary,
            problem.edge_factor,
            &solution,
        )?;
        if !summary.all_targets_met() {
            warn!("Selection misses at least one target");
        }

        Ok(PlanOutcome {
            boundary,
            model,
            solution,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::PlanError;
    use crate::domain::{SolutionStatus, SolverError};

    /// Selects every unit that is not locked out
    struct SelectAll;

    impl SolverService for SelectAll {
        fn solve(
            &self,
            model: &ReserveModel,
            _config: &SolverConfig,
        ) -> crate::domain::Result<ReserveSolution> {
            let values: Vec<f64> = (0..model.num_units())
                .map(|i| model.variable_bounds(i).1)
                .collect();
            ReserveSolution::from_values(model, SolutionStatus::Optimal, &values, None)
                .map_err(|e| SolverError::InvalidProblem(e.to_string()))
        }

        fn name(&self) -> &str {
            "select-all"
        }
    }

    struct Failing;

    impl SolverService for Failing {
        fn solve(
            &self,
            _model: &ReserveModel,
            _config: &SolverConfig,
        ) -> crate::domain::Result<ReserveSolution> {
            Err(SolverError::Infeasible)
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn problem() -> PlanningProblem {
        let grid = PlanningGrid::unit_squares(2, 2).unwrap();
        PlanningProblem::new(
            grid,
            vec![1.0, 2.0, 3.0, 4.0],
            vec![vec![1.0, 1.0, 0.0, 0.0]],
            TargetSpec::uniform_percent(0.5),
        )
        .with_boundary_weight(1.0)
    }

    #[test]
    fn test_plan_uses_grid_boundary() {
        let planner = ReservePlanner::new(Arc::new(SelectAll));
        let outcome = planner.plan(&problem()).unwrap();

        assert_eq!(outcome.solution.selected_units, vec![0, 1, 2, 3]);
        assert!((outcome.summary.total_cost - 10.0).abs() < 1e-9);
        assert!((outcome.summary.boundary_length - 8.0).abs() < 1e-9);
        assert!((outcome.solution.objective_value - 18.0).abs() < 1e-9);
        assert!(outcome.summary.all_targets_met());
    }

    #[test]
    fn test_plan_respects_locked_out() {
        let planner = ReservePlanner::new(Arc::new(SelectAll));
        let mut p = problem();
        p.locked_out = vec![3];
        let outcome = planner.plan(&p).unwrap();
        assert_eq!(outcome.solution.selected_units, vec![0, 1, 2]);
    }

    #[test]
    fn test_plan_propagates_errors() {
        let planner = ReservePlanner::new(Arc::new(Failing));
        assert!(matches!(
            planner.plan(&problem()),
            Err(PlanError::Solver(SolverError::Infeasible))
        ));

        let mut bad = problem();
        bad.boundary_weight = -1.0;
        let planner = ReservePlanner::new(Arc::new(SelectAll));
        assert!(matches!(planner.plan(&bad), Err(PlanError::Model(_))));
    }
}
