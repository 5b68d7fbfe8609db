//! Assembly of the reserve-selection program.
//!
//! For boundary weight `b` and edge factor `e` the linear coefficient of unit
//! `i` is `cost[i] + b * (e * external[i] + Σ_j shared[i, j])` and the
//! quadratic coefficient of a pair is `Q[i, j] = -b * shared[i, j]`. Selecting
//! both units of a pair cancels their shared edge, so `objᵀx + xᵀQx` equals
//! total cost plus `b` times the exposed boundary of the reserve.

use tracing::debug;

use super::boundary::BoundaryMatrix;
use super::error::{ModelError, ModelResult};
use super::models::ReserveModel;
use super::sparse::SparseMatrix;
use super::targets::TargetSpec;
use super::value_objects::{ConstraintSense, LockStatus, VariableType};

#[derive(Debug, Clone)]
pub struct ModelBuilder<'a> {
    costs: &'a [f64],
    /// features × units
    occupancy: &'a [Vec<f64>],
    boundary: Option<&'a BoundaryMatrix>,
    boundary_weight: f64,
    edge_factor: f64,
    targets: TargetSpec,
    locked_in: Vec<usize>,
    locked_out: Vec<usize>,
}

impl<'a> ModelBuilder<'a> {
    /// Start a model with zero boundary weight, edge factor 1 and a zero target.
    pub fn new(costs: &'a [f64], occupancy: &'a [Vec<f64>]) -> Self {
        Self {
            costs,
            occupancy,
            boundary: None,
            boundary_weight: 0.0,
            edge_factor: 1.0,
            targets: TargetSpec::uniform_percent(0.0),
            locked_in: Vec::new(),
            locked_out: Vec::new(),
        }
    }

    pub fn with_boundary(mut self, boundary: &'a BoundaryMatrix) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn with_boundary_weight(mut self, weight: f64) -> Self {
        self.boundary_weight = weight;
        self
    }

    pub fn with_edge_factor(mut self, edge_factor: f64) -> Self {
        self.edge_factor = edge_factor;
        self
    }

    pub fn with_targets(mut self, targets: TargetSpec) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_locked_in(mut self, units: Vec<usize>) -> Self {
        self.locked_in = units;
        self
    }

    pub fn with_locked_out(mut self, units: Vec<usize>) -> Self {
        self.locked_out = units;
        self
    }

    /// Validate every input, then construct the coefficient structures.
    pub fn build(self) -> ModelResult<ReserveModel> {
        let units = self.costs.len();
        self.validate()?;

        let totals: Vec<f64> = self.occupancy.iter().map(|row| row.iter().sum()).collect();
        let rhs = self.targets.resolve(&totals)?;
        let locks = self.resolve_locks()?;

        let b = self.boundary_weight;
        let mut obj = self.costs.to_vec();
        let mut q = SparseMatrix::new(units, units);

        if b > 0.0 {
            if let Some(boundary) = self.boundary {
                for (i, c) in obj.iter_mut().enumerate() {
                    let exposed =
                        boundary.external(i) * self.edge_factor + boundary.shared_total(i);
                    *c += b * exposed;
                }
                for (i, j, length) in boundary.shared_entries() {
                    q.push_unchecked(i, j, -b * length);
                    q.push_unchecked(j, i, -b * length);
                }
            }
        }

        let mut a = SparseMatrix::new(self.occupancy.len(), units);
        for (f, row) in self.occupancy.iter().enumerate() {
            for (i, &amount) in row.iter().enumerate() {
                if amount != 0.0 {
                    a.push_unchecked(f, i, amount);
                }
            }
        }

        debug!(
            units,
            features = rhs.len(),
            quadratic_terms = q.nnz(),
            constraint_terms = a.nnz(),
            "Assembled reserve model"
        );

        Ok(ReserveModel {
            obj,
            q,
            a,
            sense: vec![ConstraintSense::GreaterThanOrEqual; rhs.len()],
            rhs,
            vtype: vec![VariableType::Binary; units],
            locks,
        })
    }

    fn validate(&self) -> ModelResult<()> {
        let units = self.costs.len();
        if units == 0 {
            return Err(ModelError::Empty("planning units"));
        }
        if self.occupancy.is_empty() {
            return Err(ModelError::Empty("features"));
        }
        for (f, row) in self.occupancy.iter().enumerate() {
            if row.len() != units {
                return Err(ModelError::DimensionMismatch {
                    what: format!("occupancy of feature {}", f),
                    expected: units,
                    actual: row.len(),
                });
            }
            if let Some(&bad) = row.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(ModelError::InvalidValue {
                    what: format!("occupancy of feature {}", f),
                    value: bad,
                });
            }
        }
        if let Some(&bad) = self.costs.iter().find(|c| !c.is_finite()) {
            return Err(ModelError::InvalidValue {
                what: "cost".to_string(),
                value: bad,
            });
        }
        if !self.boundary_weight.is_finite() || self.boundary_weight < 0.0 {
            return Err(ModelError::InvalidBoundaryWeight(self.boundary_weight));
        }
        if !self.edge_factor.is_finite() || self.edge_factor < 0.0 {
            return Err(ModelError::InvalidEdgeFactor(self.edge_factor));
        }
        if let Some(boundary) = self.boundary {
            if boundary.num_units() != units {
                return Err(ModelError::DimensionMismatch {
                    what: "boundary matrix".to_string(),
                    expected: units,
                    actual: boundary.num_units(),
                });
            }
        }
        Ok(())
    }

    fn resolve_locks(&self) -> ModelResult<Vec<LockStatus>> {
        let units = self.costs.len();
        let mut locks = vec![LockStatus::Free; units];

        let out_of_range = |unit: usize| ModelError::UnitOutOfRange { unit, units };

        for &i in &self.locked_in {
            let slot = locks.get_mut(i).ok_or_else(|| out_of_range(i))?;
            *slot = LockStatus::LockedIn;
        }
        for &i in &self.locked_out {
            let slot = locks.get_mut(i).ok_or_else(|| out_of_range(i))?;
            if *slot == LockStatus::LockedIn {
                return Err(ModelError::ConflictingLock(i));
            }
            *slot = LockStatus::LockedOut;
        }
        Ok(locks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::PlanningGrid;

    fn two_cells() -> BoundaryMatrix {
        BoundaryMatrix::from_grid(&PlanningGrid::unit_squares(1, 2).unwrap())
    }

    #[test]
    fn test_two_cell_objective_adds_full_perimeter() {
        let costs = [10.0, 20.0];
        let occupancy = vec![vec![1.0, 1.0]];
        let boundary = two_cells();

        let model = ModelBuilder::new(&costs, &occupancy)
            .with_boundary(&boundary)
            .with_boundary_weight(1.0)
            .with_edge_factor(1.0)
            .build()
            .unwrap();

        assert_eq!(model.obj, vec![14.0, 24.0]);
        let q = model.q.to_csr();
        assert_eq!(q.get(0, 1), -1.0);
        assert_eq!(q.get(1, 0), -1.0);
        assert_eq!(q.get(0, 0), 0.0);
        // both selected: cost 30 plus the outer perimeter 6
        assert_eq!(model.evaluate(&[1.0, 1.0]).unwrap(), 36.0);
    }

    #[test]
    fn test_zero_weight_is_pure_linear() {
        let costs = [3.5, 1.25, 7.0, 0.5];
        let occupancy = vec![vec![1.0, 0.0, 2.0, 1.0]];
        let boundary = BoundaryMatrix::from_grid(&PlanningGrid::unit_squares(2, 2).unwrap());

        let model = ModelBuilder::new(&costs, &occupancy)
            .with_boundary(&boundary)
            .with_boundary_weight(0.0)
            .build()
            .unwrap();

        assert!(model.q.is_empty());
        assert!(!model.is_quadratic());
        assert_eq!(model.obj, costs.to_vec());
    }

    #[test]
    fn test_zero_edge_factor_drops_external_term() {
        let costs = [1.0; 9];
        let occupancy = vec![vec![1.0; 9]];
        let grid = PlanningGrid::unit_squares(3, 3).unwrap();
        let boundary = BoundaryMatrix::from_grid(&grid);

        let model = ModelBuilder::new(&costs, &occupancy)
            .with_boundary(&boundary)
            .with_boundary_weight(2.0)
            .with_edge_factor(0.0)
            .build()
            .unwrap();

        for i in 0..9 {
            assert_eq!(model.obj[i], costs[i] + 2.0 * boundary.shared_total(i));
        }
        // corner: two neighbours
        assert_eq!(model.obj[0], 5.0);
        // centre: four neighbours
        assert_eq!(model.obj[4], 9.0);
    }

    #[test]
    fn test_constraint_rows_mirror_occupancy() {
        let costs = [1.0, 1.0, 1.0];
        let occupancy = vec![vec![1.0, 0.0, 3.0], vec![0.0, 2.0, 2.0]];

        let model = ModelBuilder::new(&costs, &occupancy)
            .with_targets(TargetSpec::percent(vec![0.5, 1.0]))
            .build()
            .unwrap();

        assert_eq!(model.rhs, vec![2.0, 4.0]);
        assert_eq!(model.sense, vec![ConstraintSense::GreaterThanOrEqual; 2]);
        assert_eq!(model.vtype, vec![VariableType::Binary; 3]);
        let a = model.constraint_rows();
        assert_eq!(a.nnz(), 4);
        assert_eq!(a.get(0, 2), 3.0);
        assert_eq!(a.get(1, 0), 0.0);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let costs = [1.0, 2.0];
        let occupancy = vec![vec![1.0, 1.0, 1.0]];
        assert!(matches!(
            ModelBuilder::new(&costs, &occupancy).build(),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 3, .. })
        ));

        let occupancy = vec![vec![1.0, 1.0]];
        assert_eq!(
            ModelBuilder::new(&costs, &occupancy)
                .with_boundary_weight(-0.5)
                .build()
                .unwrap_err(),
            ModelError::InvalidBoundaryWeight(-0.5)
        );
        assert!(matches!(
            ModelBuilder::new(&costs, &occupancy)
                .with_targets(TargetSpec::uniform_percent(1.5))
                .build(),
            Err(ModelError::PercentOutOfRange { .. })
        ));
        assert!(matches!(
            ModelBuilder::new(&costs, &occupancy)
                .with_edge_factor(-1.0)
                .build(),
            Err(ModelError::InvalidEdgeFactor(_))
        ));

        let boundary = BoundaryMatrix::from_grid(&PlanningGrid::unit_squares(2, 2).unwrap());
        assert!(matches!(
            ModelBuilder::new(&costs, &occupancy)
                .with_boundary(&boundary)
                .build(),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 4, .. })
        ));

        let empty: [f64; 0] = [];
        assert_eq!(
            ModelBuilder::new(&empty, &[]).build().unwrap_err(),
            ModelError::Empty("planning units")
        );
    }

    #[test]
    fn test_locks_become_bounds() {
        let costs = [1.0, 1.0, 1.0];
        let occupancy = vec![vec![1.0, 1.0, 1.0]];

        let model = ModelBuilder::new(&costs, &occupancy)
            .with_locked_in(vec![0])
            .with_locked_out(vec![2])
            .build()
            .unwrap();
        assert_eq!(model.variable_bounds(0), (1.0, 1.0));
        assert_eq!(model.variable_bounds(1), (0.0, 1.0));
        assert_eq!(model.variable_bounds(2), (0.0, 0.0));

        assert_eq!(
            ModelBuilder::new(&costs, &occupancy)
                .with_locked_in(vec![1])
                .with_locked_out(vec![1])
                .build()
                .unwrap_err(),
            ModelError::ConflictingLock(1)
        );
        assert_eq!(
            ModelBuilder::new(&costs, &occupancy)
                .with_locked_in(vec![3])
                .build()
                .unwrap_err(),
            ModelError::UnitOutOfRange { unit: 3, units: 3 }
        );
    }
}
