//! Boundary length matrix over planning units.
//!
//! Off-diagonal entries hold the length of edge shared by two units; the
//! diagonal holds each unit's external (unshared) boundary. For a grid of
//! uniform cells every row therefore sums to the cell perimeter.

use std::collections::BTreeMap;

use super::error::{ModelError, ModelResult};
use super::grid::PlanningGrid;
use super::sparse::{CsrMatrix, SparseMatrix};

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMatrix {
    shared: CsrMatrix,
    external: Vec<f64>,
}

impl BoundaryMatrix {
    /// Shared and external boundaries of a rectangular grid.
    ///
    /// Horizontal neighbours share an edge of length `cell_height`, vertical
    /// neighbours one of length `cell_width`. Diagonal neighbours share nothing.
    pub fn from_grid(grid: &PlanningGrid) -> Self {
        let n = grid.num_units();
        let mut shared = SparseMatrix::new(n, n);
        let mut external = vec![grid.cell_perimeter(); n];

        for row in 0..grid.nrows {
            for col in 0..grid.ncols {
                let i = grid.index(row, col);
                if col + 1 < grid.ncols {
                    let j = grid.index(row, col + 1);
                    add_shared(&mut shared, &mut external, i, j, grid.cell_height);
                }
                if row + 1 < grid.nrows {
                    let j = grid.index(row + 1, col);
                    add_shared(&mut shared, &mut external, i, j, grid.cell_width);
                }
            }
        }

        // Rounding can leave tiny negatives on fully enclosed cells
        for e in external.iter_mut() {
            if *e < 0.0 {
                *e = 0.0;
            }
        }

        Self {
            shared: shared.to_csr(),
            external,
        }
    }

    /// Build from a boundary table of `(id1, id2, length)` rows.
    ///
    /// `id1 == id2` gives the external boundary of that unit; any other row is
    /// a shared edge applied to both `(id1, id2)` and `(id2, id1)`. Repeating a
    /// pair is accepted only with the same length.
    pub fn from_entries(num_units: usize, entries: &[(usize, usize, f64)]) -> ModelResult<Self> {
        if num_units == 0 {
            return Err(ModelError::Empty("planning units"));
        }

        let mut pairs: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for &(a, b, length) in entries {
            if a >= num_units || b >= num_units {
                return Err(ModelError::InvalidBoundary(format!(
                    "unit pair ({}, {}) refers to a unit outside 0..{}",
                    a, b, num_units
                )));
            }
            if !length.is_finite() || length < 0.0 {
                return Err(ModelError::InvalidBoundary(format!(
                    "length {} for pair ({}, {}) must be finite and non-negative",
                    length, a, b
                )));
            }
            let key = (a.min(b), a.max(b));
            match pairs.get(&key) {
                Some(&existing) if existing != length => {
                    return Err(ModelError::InvalidBoundary(format!(
                        "pair ({}, {}) listed with lengths {} and {}",
                        key.0, key.1, existing, length
                    )));
                }
                Some(_) => {}
                None => {
                    pairs.insert(key, length);
                }
            }
        }

        let mut shared = SparseMatrix::new(num_units, num_units);
        let mut external = vec![0.0; num_units];
        for ((a, b), length) in pairs {
            if a == b {
                external[a] = length;
            } else if length > 0.0 {
                shared.push(a, b, length)?;
                shared.push(b, a, length)?;
            }
        }

        Ok(Self {
            shared: shared.to_csr(),
            external,
        })
    }

    pub fn num_units(&self) -> usize {
        self.external.len()
    }

    pub fn shared(&self, i: usize, j: usize) -> f64 {
        self.shared.get(i, j)
    }

    pub fn external(&self, i: usize) -> f64 {
        self.external.get(i).copied().unwrap_or(0.0)
    }

    pub fn externals(&self) -> &[f64] {
        &self.external
    }

    /// Sum of shared lengths touching unit `i`.
    pub fn shared_total(&self, i: usize) -> f64 {
        self.shared.row(i).map(|(_, v)| v).sum()
    }

    /// Full row of the boundary matrix: shared plus external.
    pub fn row_total(&self, i: usize) -> f64 {
        self.shared_total(i) + self.external(i)
    }

    /// Units sharing an edge with `i`, with the shared length.
    pub fn neighbours(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.shared.row(i)
    }

    /// Each adjacent pair once, as `(i, j, length)` with `i < j`.
    pub fn shared_entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.num_units()).flat_map(move |i| {
            self.shared
                .row(i)
                .filter(move |&(j, _)| j > i)
                .map(move |(j, v)| (i, j, v))
        })
    }

    /// The boundary matrix as triplets, external lengths on the diagonal.
    pub fn to_sparse(&self) -> SparseMatrix {
        let n = self.num_units();
        let mut matrix = SparseMatrix::new(n, n);
        for i in 0..n {
            for (j, v) in self.shared.row(i) {
                matrix.push_unchecked(i, j, v);
            }
            if self.external[i] != 0.0 {
                matrix.push_unchecked(i, i, self.external[i]);
            }
        }
        matrix
    }
}

fn add_shared(
    shared: &mut SparseMatrix,
    external: &mut [f64],
    i: usize,
    j: usize,
    length: f64,
) {
    shared.push_unchecked(i, j, length);
    shared.push_unchecked(j, i, length);
    external[i] -= length;
    external[j] -= length;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_two_unit_squares_share_one_edge() {
        let grid = PlanningGrid::unit_squares(1, 2).unwrap();
        let bm = BoundaryMatrix::from_grid(&grid);

        assert_eq!(bm.shared(0, 1), 1.0);
        assert_eq!(bm.shared(1, 0), 1.0);
        assert_eq!(bm.external(0), 3.0);
        assert_eq!(bm.external(1), 3.0);
        assert_eq!(bm.shared_entries().collect::<Vec<_>>(), vec![(0, 1, 1.0)]);
    }

    #[test]
    fn test_rows_sum_to_cell_perimeter() {
        let grid = PlanningGrid::new(4, 5, 2.5, 1.5).unwrap();
        let bm = BoundaryMatrix::from_grid(&grid);

        let row_sums = bm.to_sparse().to_csr().row_sums();
        for (i, sum) in row_sums.iter().enumerate() {
            assert_close(*sum, grid.cell_perimeter());
            assert_close(bm.row_total(i), grid.cell_perimeter());
        }
    }

    #[test]
    fn test_border_cells_have_larger_external_share() {
        let grid = PlanningGrid::unit_squares(3, 3).unwrap();
        let bm = BoundaryMatrix::from_grid(&grid);

        assert_eq!(bm.external(grid.index(1, 1)), 0.0);
        assert_eq!(bm.external(grid.index(0, 1)), 1.0);
        assert_eq!(bm.external(grid.index(0, 0)), 2.0);
        assert_eq!(bm.neighbours(grid.index(1, 1)).count(), 4);
        assert_eq!(bm.shared_entries().count(), 12);
    }

    #[test]
    fn test_rectangular_cells_use_matching_edge() {
        let grid = PlanningGrid::new(2, 2, 4.0, 1.0).unwrap();
        let bm = BoundaryMatrix::from_grid(&grid);

        // horizontal neighbours share the cell height
        assert_eq!(bm.shared(0, 1), 1.0);
        // vertical neighbours share the cell width
        assert_eq!(bm.shared(0, 2), 4.0);
        assert_eq!(bm.shared(0, 3), 0.0);
        assert_eq!(bm.external(0), 10.0 - 5.0);
    }

    #[test]
    fn test_single_cell_is_all_external() {
        let grid = PlanningGrid::unit_squares(1, 1).unwrap();
        let bm = BoundaryMatrix::from_grid(&grid);
        assert_eq!(bm.external(0), 4.0);
        assert_eq!(bm.shared_total(0), 0.0);
    }

    #[test]
    fn test_from_entries_mirrors_shared_edges() {
        let bm = BoundaryMatrix::from_entries(
            3,
            &[(0, 0, 3.0), (0, 1, 1.0), (1, 0, 1.0), (1, 2, 2.5), (2, 2, 0.5)],
        )
        .unwrap();

        assert_eq!(bm.shared(1, 0), 1.0);
        assert_eq!(bm.shared(2, 1), 2.5);
        assert_eq!(bm.external(0), 3.0);
        assert_eq!(bm.external(1), 0.0);
        assert_eq!(bm.row_total(1), 3.5);
    }

    #[test]
    fn test_from_entries_rejects_bad_rows() {
        assert!(BoundaryMatrix::from_entries(2, &[(0, 2, 1.0)]).is_err());
        assert!(BoundaryMatrix::from_entries(2, &[(0, 1, -1.0)]).is_err());
        assert!(BoundaryMatrix::from_entries(2, &[(0, 1, 1.0), (1, 0, 2.0)]).is_err());
        assert!(matches!(
            BoundaryMatrix::from_entries(0, &[]),
            Err(ModelError::Empty(_))
        ));
    }
}
