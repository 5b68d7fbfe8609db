// Exact linearisation of binary products in the boundary term
//
// For binary x_i, x_j the product x_i * x_j equals y_ij whenever
//   y_ij <= x_i, y_ij <= x_j, y_ij >= x_i + x_j - 1, 0 <= y_ij <= 1.
// Under minimisation a non-positive coefficient only needs the two upper rows.

use std::collections::BTreeMap;

use crate::domain::models::ReserveModel;

/// Coefficient of `x_i * x_j` in `xᵀQx`, i.e. `Q[i,j] + Q[j,i]`, with `i < j`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairTerm {
    pub i: usize,
    pub j: usize,
    pub coefficient: f64,
}

impl PairTerm {
    /// Whether the lower linking row `y >= x_i + x_j - 1` is required
    pub fn needs_lower_link(&self) -> bool {
        self.coefficient > 0.0
    }
}

pub fn pair_terms(model: &ReserveModel) -> Vec<PairTerm> {
    let mut pairs: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for t in model.q.triplets() {
        if t.row != t.col {
            *pairs.entry((t.row.min(t.col), t.row.max(t.col))).or_insert(0.0) += t.value;
        }
    }
    pairs
        .into_iter()
        .filter(|(_, c)| *c != 0.0)
        .map(|((i, j), coefficient)| PairTerm { i, j, coefficient })
        .collect()
}
