use super::error::{ModelError, ModelResult};

/// Rectangular grid of planning units, indexed row-major
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanningGrid {
    pub nrows: usize,
    pub ncols: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl PlanningGrid {
    pub fn new(nrows: usize, ncols: usize, cell_width: f64, cell_height: f64) -> ModelResult<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(ModelError::InvalidGrid(format!(
                "dimensions must be positive, got {}x{}",
                nrows, ncols
            )));
        }
        if !(cell_width.is_finite() && cell_width > 0.0) {
            return Err(ModelError::InvalidGrid(format!(
                "cell width must be positive, got {}",
                cell_width
            )));
        }
        if !(cell_height.is_finite() && cell_height > 0.0) {
            return Err(ModelError::InvalidGrid(format!(
                "cell height must be positive, got {}",
                cell_height
            )));
        }
        Ok(Self {
            nrows,
            ncols,
            cell_width,
            cell_height,
        })
    }

    /// Grid of 1x1 cells
    pub fn unit_squares(nrows: usize, ncols: usize) -> ModelResult<Self> {
        Self::new(nrows, ncols, 1.0, 1.0)
    }

    pub fn num_units(&self) -> usize {
        self.nrows * self.ncols
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.ncols + col
    }

    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.ncols, index % self.ncols)
    }

    pub fn cell_perimeter(&self) -> f64 {
        2.0 * (self.cell_width + self.cell_height)
    }
}
