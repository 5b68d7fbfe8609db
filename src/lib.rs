// Domain layer: Grid, boundary and model rules
pub mod domain;

// Application layer: Plan orchestration
pub mod application;

// Infrastructure layer: Plan files, CSV grids, logging
pub mod infrastructure;

// Solver adapters: Concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    BoundaryMatrix, ModelBuilder, ModelError, PlanningGrid, ReserveModel, ReserveSolution,
    ReserveSummary, SolutionStatus, SolverBackend, SolverConfig, SolverError, SolverService,
    TargetKind, TargetSpec,
};

pub use application::{PlanError, PlanOutcome, PlanningProblem, ReservePlanner};

pub use infrastructure::{LoadError, PlanFile, PlanOverrides};

#[cfg(feature = "solvers")]
pub use solver::{CoinCbcSolver, HighsSolver, SolverFactory};
