use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading plan files and input grids
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse plan file '{}': {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid number '{value}' in '{}' at row {row}, column {col}", .path.display())]
    InvalidNumber {
        path: PathBuf,
        row: usize,
        col: usize,
        value: String,
    },

    #[error("Grid '{}' is ragged: row {row} has {actual} columns, expected {expected}", .path.display())]
    RaggedGrid {
        path: PathBuf,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Grid '{}' is empty", .path.display())]
    EmptyGrid { path: PathBuf },

    #[error(
        "Grid '{}' is {actual_rows}x{actual_cols} but the cost grid is {rows}x{cols}",
        .path.display()
    )]
    GridMismatch {
        path: PathBuf,
        rows: usize,
        cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}
