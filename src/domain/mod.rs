// Domain module: reserve-design models and rules

pub mod boundary;
pub mod error;
pub mod grid;
pub mod model_builder;
pub mod models;
pub mod solver_service;
pub mod sparse;
pub mod summary;
pub mod targets;
pub mod value_objects;

pub use boundary::BoundaryMatrix;
pub use error::{ModelError, ModelResult};
pub use grid::PlanningGrid;
pub use model_builder::ModelBuilder;
pub use models::*;
pub use solver_service::*;
pub use sparse::{CsrMatrix, SparseMatrix, Triplet};
pub use summary::{exposed_boundary, FeatureRepresentation, ReserveSummary};
pub use targets::TargetSpec;
pub use value_objects::*;
