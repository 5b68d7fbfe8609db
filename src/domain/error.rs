// Validation errors raised before any model is constructed

/// Error types for input validation and model construction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Dimension mismatch: {what} has length {actual}, expected {expected}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Entry ({row}, {col}) lies outside a {nrows}x{ncols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },

    #[error("Boundary weight must be finite and non-negative, got {0}")]
    InvalidBoundaryWeight(f64),

    #[error("Edge factor must be finite and non-negative, got {0}")]
    InvalidEdgeFactor(f64),

    #[error("Percent target for feature {feature} must lie in [0, 1], got {value}")]
    PercentOutOfRange { feature: usize, value: f64 },

    #[error(
        "Absolute target for feature {feature} is {value} but must lie between 0 and the feature total {total}"
    )]
    AbsoluteOutOfRange {
        feature: usize,
        value: f64,
        total: f64,
    },

    #[error("Expected 1 or {features} target values, got {actual}")]
    TargetCount { features: usize, actual: usize },

    #[error("Invalid {what}: {value}")]
    InvalidValue { what: String, value: f64 },

    #[error("Invalid boundary entry: {0}")]
    InvalidBoundary(String),

    #[error("Unit {unit} lies outside 0..{units}")]
    UnitOutOfRange { unit: usize, units: usize },

    #[error("Unit {0} cannot be both locked in and locked out")]
    ConflictingLock(usize),

    #[error("Model has no {0}")]
    Empty(&'static str),
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
