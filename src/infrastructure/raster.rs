// CSV rasters: one grid row per line, comma separated, no header

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Deserialize;
use tracing::debug;

use super::error::LoadError;
use crate::domain::grid::PlanningGrid;

/// A rectangular layer of values, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub nrows: usize,
    pub ncols: usize,
    pub values: Vec<f64>,
}

impl Raster {
    pub fn same_shape(&self, other: &Raster) -> bool {
        self.nrows == other.nrows && self.ncols == other.ncols
    }
}

pub fn read_raster(path: &Path) -> Result<Raster, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut values = Vec::new();
    let mut nrows = 0usize;
    let mut ncols = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if row == 0 {
            ncols = record.len();
        } else if record.len() != ncols {
            return Err(LoadError::RaggedGrid {
                path: path.to_path_buf(),
                row,
                expected: ncols,
                actual: record.len(),
            });
        }
        for (col, field) in record.iter().enumerate() {
            let value = field.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
                path: path.to_path_buf(),
                row,
                col,
                value: field.to_string(),
            })?;
            values.push(value);
        }
        nrows += 1;
    }

    if nrows == 0 || ncols == 0 {
        return Err(LoadError::EmptyGrid {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), nrows, ncols, "Read raster");
    Ok(Raster {
        nrows,
        ncols,
        values,
    })
}

/// Write a selection as a 0/1 raster in the grid's shape.
pub fn write_selection(path: &Path, grid: &PlanningGrid, selection: &[bool]) -> Result<(), LoadError> {
    if selection.len() != grid.num_units() {
        return Err(LoadError::Config(format!(
            "selection has {} units but the grid has {}",
            selection.len(),
            grid.num_units()
        )));
    }

    let file = File::create(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    for row in selection.chunks(grid.ncols) {
        writer
            .write_record(row.iter().map(|&s| if s { "1" } else { "0" }))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct BoundaryRow {
    id1: usize,
    id2: usize,
    boundary: f64,
}

/// Read a boundary table with header `id1,id2,boundary` (unit indices, 0-based).
pub fn read_boundary_table(path: &Path) -> Result<Vec<(usize, usize, f64)>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    reader
        .deserialize::<BoundaryRow>()
        .map(|row| {
            row.map(|r| (r.id1, r.id2, r.boundary))
                .map_err(|source| LoadError::Csv {
                    path: path.to_path_buf(),
                    source,
                })
        })
        .collect()
}
