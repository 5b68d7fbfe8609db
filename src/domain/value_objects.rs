// Domain value objects representing core reserve-design concepts

use serde::Deserialize;
use std::fmt;

/// Type of a planning-unit decision variable
///
/// Auxiliary boundary columns are created by the solver adapters and never
/// appear in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Comparison of a representation constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintSense::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// How representation targets are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Fraction in [0, 1] of each feature's total abundance
    Percent,
    /// Amount of each feature, in occupancy units
    Absolute,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Percent => write!(f, "percent"),
            TargetKind::Absolute => write!(f, "absolute"),
        }
    }
}

/// Whether a planning unit is free for the solver to choose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockStatus {
    #[default]
    Free,
    /// Must be part of the reserve
    LockedIn,
    /// Must stay out of the reserve
    LockedOut,
}

impl LockStatus {
    /// Bounds of the selection variable for a unit with this status
    pub fn bounds(self) -> (f64, f64) {
        match self {
            LockStatus::Free => (0.0, 1.0),
            LockStatus::LockedIn => (1.0, 1.0),
            LockStatus::LockedOut => (0.0, 0.0),
        }
    }
}

/// Status of a solver run that produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Solved to optimality (within the configured gap)
    Optimal,
    /// Stopped once the incumbent was within the configured gap of the bound
    GapLimit,
    /// Time limit reached with a feasible incumbent
    TimeLimit,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::GapLimit => write!(f, "Gap Limit Reached"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverBackend {
    /// Automatically select best solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}
