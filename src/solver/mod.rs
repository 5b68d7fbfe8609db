// Solver adapters module

pub mod incumbent;
pub mod linearize;

#[cfg(feature = "solvers")]
pub mod coin_cbc_solver;
#[cfg(feature = "solvers")]
pub mod factory;
#[cfg(feature = "solvers")]
pub mod highs_solver;

pub use incumbent::accept_solution;
pub use linearize::{pair_terms, PairTerm};

#[cfg(feature = "solvers")]
pub use coin_cbc_solver::CoinCbcSolver;
#[cfg(feature = "solvers")]
pub use factory::SolverFactory;
#[cfg(feature = "solvers")]
pub use highs_solver::HighsSolver;
