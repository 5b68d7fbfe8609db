use super::boundary::BoundaryMatrix;
use super::error::{ModelError, ModelResult};
use super::models::{as_values, ReserveModel, ReserveSolution, FEASIBILITY_TOLERANCE};

/// How one feature is represented in a reserve
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRepresentation {
    pub feature: usize,
    pub held: f64,
    pub target: f64,
}

impl FeatureRepresentation {
    /// Same slack as `ReserveModel::is_feasible` with `FEASIBILITY_TOLERANCE`
    pub fn is_met(&self) -> bool {
        self.held >= self.target - FEASIBILITY_TOLERANCE
    }

    /// Held amount as a fraction of the target (1.0 when the target is zero)
    pub fn coverage(&self) -> f64 {
        if self.target > 0.0 {
            self.held / self.target
        } else {
            1.0
        }
    }
}

/// Figures describing a selected reserve
#[derive(Debug, Clone, PartialEq)]
pub struct ReserveSummary {
    pub num_selected: usize,
    pub total_cost: f64,
    /// Boundary of the reserve not shared with another selected unit, with
    /// external edges scaled by the edge factor
    pub boundary_length: f64,
    pub objective_value: f64,
    pub objective_bound: Option<f64>,
    pub gap: Option<f64>,
    pub features: Vec<FeatureRepresentation>,
}

impl ReserveSummary {
    pub fn new(
        model: &ReserveModel,
        costs: &[f64],
        boundary: &BoundaryMatrix,
        edge_factor: f64,
        solution: &ReserveSolution,
    ) -> ModelResult<Self> {
        let x = as_values(&solution.selection);
        if costs.len() != x.len() {
            return Err(ModelError::DimensionMismatch {
                what: "costs".to_string(),
                expected: x.len(),
                actual: costs.len(),
            });
        }

        let total_cost = costs.iter().zip(&x).map(|(c, v)| c * v).sum();
        let boundary_length = exposed_boundary(boundary, edge_factor, &solution.selection)?;
        let held = model.representation(&x)?;
        let features = held
            .into_iter()
            .zip(&model.rhs)
            .enumerate()
            .map(|(feature, (held, &target))| FeatureRepresentation {
                feature,
                held,
                target,
            })
            .collect();

        Ok(Self {
            num_selected: solution.num_selected(),
            total_cost,
            boundary_length,
            objective_value: solution.objective_value,
            objective_bound: solution.objective_bound,
            gap: solution.gap(),
            features,
        })
    }

    pub fn all_targets_met(&self) -> bool {
        self.features.iter().all(FeatureRepresentation::is_met)
    }
}

/// Perimeter of a selection: external edges of selected units (scaled by
/// `edge_factor`) plus edges shared with unselected units.
pub fn exposed_boundary(
    boundary: &BoundaryMatrix,
    edge_factor: f64,
    selection: &[bool],
) -> ModelResult<f64> {
    if selection.len() != boundary.num_units() {
        return Err(ModelError::DimensionMismatch {
            what: "selection".to_string(),
            expected: boundary.num_units(),
            actual: selection.len(),
        });
    }

    let mut length = 0.0;
    for (i, _) in selection.iter().enumerate().filter(|(_, s)| **s) {
        length += boundary.external(i) * edge_factor;
        length += boundary
            .neighbours(i)
            .filter(|&(j, _)| !selection[j])
            .map(|(_, v)| v)
            .sum::<f64>();
    }
    Ok(length)
}
