//! Triplet-based sparse matrices.
//!
//! Coefficients are collected as `(row, col, value)` triplets while a model is
//! assembled and converted to compressed sparse row form for lookups and
//! products. Duplicate coordinates are summed on conversion.

use super::error::{ModelError, ModelResult};

/// A single `(row, col, value)` entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triplet {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

impl Triplet {
    pub fn new(row: usize, col: usize, value: f64) -> Self {
        Self { row, col, value }
    }
}

/// Sparse matrix stored as an unordered list of triplets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseMatrix {
    nrows: usize,
    ncols: usize,
    triplets: Vec<Triplet>,
}

impl SparseMatrix {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            triplets: Vec::new(),
        }
    }

    /// Build from existing triplets, checking every coordinate.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: Vec<Triplet>) -> ModelResult<Self> {
        let mut matrix = Self::new(nrows, ncols);
        matrix.triplets.reserve(triplets.len());
        for t in triplets {
            matrix.push(t.row, t.col, t.value)?;
        }
        Ok(matrix)
    }

    pub fn push(&mut self, row: usize, col: usize, value: f64) -> ModelResult<()> {
        if row >= self.nrows || col >= self.ncols {
            return Err(ModelError::IndexOutOfBounds {
                row,
                col,
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        self.triplets.push(Triplet::new(row, col, value));
        Ok(())
    }

    /// Push an entry whose coordinates the caller has already bounded.
    pub(crate) fn push_unchecked(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.nrows && col < self.ncols);
        self.triplets.push(Triplet::new(row, col, value));
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored triplets (duplicates counted separately).
    pub fn nnz(&self) -> usize {
        self.triplets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triplets.is_empty()
    }

    pub fn triplets(&self) -> &[Triplet] {
        &self.triplets
    }

    pub fn to_csr(&self) -> CsrMatrix {
        let mut sorted = self.triplets.clone();
        sorted.sort_by(|a, b| (a.row, a.col).cmp(&(b.row, b.col)));

        let mut row_ptrs = vec![0usize; self.nrows + 1];
        let mut col_indices: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut values: Vec<f64> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;

        for t in sorted {
            if last == Some((t.row, t.col)) {
                if let Some(v) = values.last_mut() {
                    *v += t.value;
                }
                continue;
            }
            col_indices.push(t.col);
            values.push(t.value);
            row_ptrs[t.row + 1] += 1;
            last = Some((t.row, t.col));
        }
        for r in 0..self.nrows {
            row_ptrs[r + 1] += row_ptrs[r];
        }

        CsrMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            row_ptrs,
            col_indices,
            values,
        }
    }
}

/// Compressed sparse row matrix with sorted, unique column indices per row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsrMatrix {
    nrows: usize,
    ncols: usize,
    row_ptrs: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row_ptrs(&self) -> &[usize] {
        &self.row_ptrs
    }

    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Entries of one row as `(col, value)`; empty for rows out of range.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (start, end) = if row < self.nrows {
            (self.row_ptrs[row], self.row_ptrs[row + 1])
        } else {
            (0, 0)
        };
        self.col_indices[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.nrows {
            return 0.0;
        }
        let start = self.row_ptrs[row];
        let end = self.row_ptrs[row + 1];
        match self.col_indices[start..end].binary_search(&col) {
            Ok(pos) => self.values[start + pos],
            Err(_) => 0.0,
        }
    }

    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.nrows).map(|r| self.row(r).map(|(_, v)| v).sum()).collect()
    }

    /// Matrix-vector product `M x`.
    pub fn mul_vec(&self, x: &[f64]) -> ModelResult<Vec<f64>> {
        if x.len() != self.ncols {
            return Err(ModelError::DimensionMismatch {
                what: "vector".to_string(),
                expected: self.ncols,
                actual: x.len(),
            });
        }
        Ok((0..self.nrows)
            .map(|r| self.row(r).map(|(c, v)| v * x[c]).sum())
            .collect())
    }

    /// Quadratic form `xᵀ M x`.
    pub fn quadratic_form(&self, x: &[f64]) -> ModelResult<f64> {
        let mx = self.mul_vec(x)?;
        Ok(x.iter().zip(mx).map(|(a, b)| a * b).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_rejects_out_of_bounds() {
        let mut m = SparseMatrix::new(2, 3);
        assert!(m.push(1, 2, 1.0).is_ok());
        let err = m.push(2, 0, 1.0).unwrap_err();
        assert!(matches!(err, ModelError::IndexOutOfBounds { row: 2, .. }));
    }

    #[test]
    fn test_to_csr_sums_duplicates_and_sorts() {
        let m = SparseMatrix::from_triplets(
            3,
            3,
            vec![
                Triplet::new(2, 0, 1.0),
                Triplet::new(0, 2, 4.0),
                Triplet::new(0, 1, 2.0),
                Triplet::new(0, 2, 0.5),
            ],
        )
        .unwrap();

        let csr = m.to_csr();
        assert_eq!(csr.nnz(), 3);
        assert_eq!(csr.row_ptrs(), &[0, 2, 2, 3]);
        assert_eq!(csr.col_indices(), &[1, 2, 0]);
        assert_eq!(csr.get(0, 2), 4.5);
        assert_eq!(csr.get(1, 1), 0.0);
        assert_eq!(csr.get(7, 0), 0.0);
        assert_eq!(csr.row(1).count(), 0);
    }

    #[test]
    fn test_products() {
        let m = SparseMatrix::from_triplets(
            2,
            2,
            vec![Triplet::new(0, 1, -1.0), Triplet::new(1, 0, -1.0)],
        )
        .unwrap()
        .to_csr();

        assert_eq!(m.mul_vec(&[1.0, 1.0]).unwrap(), vec![-1.0, -1.0]);
        assert_eq!(m.quadratic_form(&[1.0, 1.0]).unwrap(), -2.0);
        assert_eq!(m.quadratic_form(&[1.0, 0.0]).unwrap(), 0.0);
        assert_eq!(m.row_sums(), vec![-1.0, -1.0]);
        assert!(m.mul_vec(&[1.0]).is_err());
    }
}
