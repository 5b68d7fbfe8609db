// Infrastructure: plan files, input grids and logging

pub mod config;
pub mod error;
pub mod logging;
pub mod raster;

pub use config::{PlanFile, PlanOverrides};
pub use error::LoadError;
pub use logging::{setup_logging, LoggingError};
pub use raster::{read_boundary_table, read_raster, write_selection, Raster};
