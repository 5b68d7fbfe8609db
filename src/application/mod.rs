// Application layer: runs one reserve-selection plan end to end

pub mod error;
pub mod planner;

pub use error::{PlanError, PlanResult};
pub use planner::{PlanOutcome, PlanningProblem, ReservePlanner};
