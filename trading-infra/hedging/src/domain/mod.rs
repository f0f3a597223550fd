//! Hedging Domain Layer
//!
//! Problem definition, objective and resulting schedule.

mod objective;
mod problem;
mod schedule;

pub use objective::VarObjective;
pub use problem::HedgeProblem;
pub use schedule::{HedgeSchedule, ScheduleStatus};
