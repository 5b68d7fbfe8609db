// Normalisation of raw backend output into a ReserveSolution

use crate::domain::{
    models::{ReserveModel, ReserveSolution, FEASIBILITY_TOLERANCE},
    solver_service::{Result, SolverError},
    value_objects::SolutionStatus,
};

/// Round the backend's column values into a selection.
///
/// A run stopped on time may hand back a point that is not a real incumbent;
/// such a selection must still meet every target or the run has no solution.
pub fn accept_solution(
    model: &ReserveModel,
    status: SolutionStatus,
    values: &[f64],
    objective_bound: Option<f64>,
) -> Result<ReserveSolution> {
    let solution = ReserveSolution::from_values(model, status, values, objective_bound)
        .map_err(|e| SolverError::ExecutionFailed(e.to_string()))?;

    if status == SolutionStatus::TimeLimit {
        let feasible = model
            .is_feasible(&solution.values(), FEASIBILITY_TOLERANCE)
            .map_err(|e| SolverError::ExecutionFailed(e.to_string()))?;
        if !feasible {
            return Err(SolverError::NoSolutionWithinTimeLimit);
        }
    }

    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model_builder::ModelBuilder;
    use crate::domain::targets::TargetSpec;

    fn model() -> ReserveModel {
        let costs = [1.0, 2.0, 3.0];
        let occupancy = vec![vec![1.0, 1.0, 0.0]];
        ModelBuilder::new(&costs, &occupancy)
            .with_targets(TargetSpec::absolute(vec![2.0]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_time_limit_rejects_infeasible_point() {
        let result = accept_solution(&model(), SolutionStatus::TimeLimit, &[1.0, 0.0, 1.0], None);
        assert!(matches!(result, Err(SolverError::NoSolutionWithinTimeLimit)));
    }

    #[test]
    fn test_time_limit_keeps_feasible_incumbent() {
        let solution =
            accept_solution(&model(), SolutionStatus::TimeLimit, &[1.0, 0.9999, 0.0], Some(2.5))
                .unwrap();
        assert_eq!(solution.status, SolutionStatus::TimeLimit);
        assert_eq!(solution.selected_units, vec![0, 1]);
        assert_eq!(solution.objective_value, 3.0);
        assert_eq!(solution.objective_bound, Some(2.5));
    }

    #[test]
    fn test_other_statuses_skip_incumbent_check() {
        let solution =
            accept_solution(&model(), SolutionStatus::GapLimit, &[1.0, 0.0, 0.0], None).unwrap();
        assert_eq!(solution.selected_units, vec![0]);
    }

    #[test]
    fn test_short_value_vector_is_an_execution_failure() {
        assert!(matches!(
            accept_solution(&model(), SolutionStatus::Optimal, &[1.0], None),
            Err(SolverError::ExecutionFailed(_))
        ));
    }
}
