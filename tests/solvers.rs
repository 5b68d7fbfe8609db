#![cfg(feature = "solvers")]
// Both MIP backends against small reserve problems with known optima

use std::sync::Arc;

use reserveopt::{
    CoinCbcSolver, HighsSolver, PlanError, PlanningGrid, PlanningProblem, ReservePlanner,
    SolutionStatus, SolverConfig, SolverError, SolverService, TargetSpec,
};

fn backends() -> Vec<Arc<dyn SolverService>> {
    vec![Arc::new(HighsSolver::new()), Arc::new(CoinCbcSolver::new())]
}

fn strip_problem(boundary_weight: f64) -> PlanningProblem {
    let grid = PlanningGrid::unit_squares(1, 4).unwrap();
    PlanningProblem::new(
        grid,
        vec![1.0, 1.0, 1.0, 1.2],
        vec![vec![1.0, 0.0, 1.0, 1.0]],
        TargetSpec::absolute(vec![2.0]),
    )
    .with_boundary_weight(boundary_weight)
}

#[test]
fn backends_agree_without_boundary_penalty() {
    for solver in backends() {
        let name = solver.name().to_string();
        let outcome = ReservePlanner::new(solver).plan(&strip_problem(0.0)).unwrap();
        assert_eq!(outcome.solution.status, SolutionStatus::Optimal, "{name}");
        assert_eq!(outcome.solution.selected_units, vec![0, 2], "{name}");
        assert!((outcome.solution.objective_value - 2.0).abs() < 1e-6, "{name}");
    }
}

#[test]
fn backends_linearise_boundary_products() {
    for solver in backends() {
        let name = solver.name().to_string();
        let outcome = ReservePlanner::new(solver).plan(&strip_problem(1.0)).unwrap();
        assert_eq!(outcome.solution.selected_units, vec![2, 3], "{name}");
        assert!((outcome.solution.objective_value - 8.2).abs() < 1e-6, "{name}");
        assert!((outcome.summary.boundary_length - 6.0).abs() < 1e-6, "{name}");
    }
}

#[test]
fn full_target_selects_all_units() {
    let grid = PlanningGrid::unit_squares(3, 4).unwrap();
    let n = grid.num_units();
    let problem = PlanningProblem::new(
        grid,
        vec![2.0; n],
        vec![vec![1.0; n]],
        TargetSpec::percent(vec![1.0]),
    )
    .with_boundary_weight(0.5);

    for solver in backends() {
        let outcome = ReservePlanner::new(solver).plan(&problem).unwrap();
        assert_eq!(outcome.solution.num_selected(), n);
        assert!((outcome.summary.boundary_length - 14.0).abs() < 1e-6);
    }
}

#[test]
fn locked_units_are_respected() {
    let mut problem = strip_problem(0.0);
    problem.locked_in = vec![1];
    problem.locked_out = vec![0];

    for solver in backends() {
        let outcome = ReservePlanner::new(solver).plan(&problem).unwrap();
        assert_eq!(outcome.solution.selected_units, vec![1, 2, 3]);
    }
}

#[test]
fn infeasible_targets_are_reported() {
    let mut problem = strip_problem(0.0);
    problem.locked_out = vec![0, 2];

    for solver in backends() {
        let name = solver.name().to_string();
        let result = ReservePlanner::new(solver).plan(&problem);
        assert!(
            matches!(result, Err(PlanError::Solver(SolverError::Infeasible))),
            "{name}: {result:?}"
        );
    }
}

fn checkerboard_problem(config: SolverConfig) -> PlanningProblem {
    let grid = PlanningGrid::unit_squares(5, 5).unwrap();
    let n = grid.num_units();
    let costs: Vec<f64> = (0..n).map(|i| 1.0 + ((i * 7) % 5) as f64).collect();
    let occupancy = vec![
        (0..n).map(|i| ((i + i / 5) % 2) as f64).collect(),
        (0..n).map(|i| if i % 3 == 0 { 2.0 } else { 0.5 }).collect(),
    ];
    PlanningProblem::new(grid, costs, occupancy, TargetSpec::percent(vec![0.4, 0.3]))
        .with_boundary_weight(0.8)
        .with_solver_config(config)
}

#[test]
fn exact_solves_report_a_tight_bound() {
    for solver in backends() {
        let name = solver.name().to_string();
        let outcome = ReservePlanner::new(solver)
            .plan(&checkerboard_problem(SolverConfig::new().with_gap(0.0)))
            .unwrap();
        let solution = &outcome.solution;
        // CBC may flag a zero-gap finish as stopped on gap
        assert!(
            matches!(solution.status, SolutionStatus::Optimal | SolutionStatus::GapLimit),
            "{name}: {}",
            solution.status
        );
        let bound = solution.objective_bound.expect("exact solve has a bound");
        assert!(bound <= solution.objective_value + 1e-6, "{name}");
        assert!(
            solution.objective_value - bound <= 1e-6 * solution.objective_value.abs().max(1.0),
            "{name}"
        );
    }
}

#[test]
fn gapped_solves_report_a_bound_within_the_gap() {
    let gap = 0.25;
    for solver in backends() {
        let name = solver.name().to_string();
        let outcome = ReservePlanner::new(solver)
            .plan(&checkerboard_problem(SolverConfig::new().with_gap(gap)))
            .unwrap();
        let solution = &outcome.solution;
        assert!(
            matches!(solution.status, SolutionStatus::Optimal | SolutionStatus::GapLimit),
            "{name}: {}",
            solution.status
        );
        let bound = solution.objective_bound.expect("gapped solve has a bound");
        assert!(bound <= solution.objective_value + 1e-6, "{name}");
        assert!(outcome.summary.gap.unwrap() <= gap + 1e-6, "{name}");
        assert!(outcome.summary.all_targets_met(), "{name}");
    }
}

#[test]
fn time_limit_still_returns_a_selection() {
    let grid = PlanningGrid::unit_squares(4, 4).unwrap();
    let n = grid.num_units();
    let costs: Vec<f64> = (0..n).map(|i| 1.0 + (i % 5) as f64).collect();
    let problem = PlanningProblem::new(
        grid,
        costs,
        vec![vec![1.0; n]],
        TargetSpec::percent(vec![0.5]),
    )
    .with_boundary_weight(1.0)
    .with_solver_config(SolverConfig::new().with_time_limit(30.0).with_gap(0.5));

    for solver in backends() {
        let outcome = ReservePlanner::new(solver).plan(&problem).unwrap();
        assert!(matches!(
            outcome.solution.status,
            SolutionStatus::Optimal | SolutionStatus::TimeLimit
        ));
        assert!(outcome.solution.num_selected() >= n / 2);
        assert!(outcome.summary.all_targets_met());
    }
}
