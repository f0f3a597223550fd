//! Uniform Schedule
//!
//! Strategy: Hedge evenly over the horizon.
//!
//! x_k = 1 / N for every step.

use super::protocol::ScheduleSolver;
use crate::domain::{HedgeProblem, HedgeSchedule, ScheduleStatus, VarObjective};
use crate::error::Result;

/// Equal-slice schedule
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSchedule;

impl UniformSchedule {
    /// Equal slices over `horizon` steps (at least one)
    pub fn fractions(horizon: usize) -> Vec<f64> {
        let n = horizon.max(1);
        vec![1.0 / n as f64; n]
    }

    /// Uniform schedule with the given status, without validating the problem
    pub(crate) fn build(
        problem: &HedgeProblem,
        cost: &dyn Fn(f64) -> f64,
        status: ScheduleStatus,
    ) -> HedgeSchedule {
        let fractions = Self::fractions(problem.horizon);
        let value = VarObjective::new(problem, cost).value(&fractions);
        HedgeSchedule::new(fractions, value, 0, status, "uniform")
    }
}

impl ScheduleSolver for UniformSchedule {
    fn solve(&self, problem: &HedgeProblem, cost: &dyn Fn(f64) -> f64) -> Result<HedgeSchedule> {
        problem.validate()?;
        Ok(Self::build(problem, cost, ScheduleStatus::Uniform))
    }

    fn name(&self) -> &str {
        "uniform"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_slices() {
        let problem = HedgeProblem::new(100.0, 4, 1.0, 1e-3);
        let schedule = UniformSchedule.solve(&problem, &|_| 1e-4).unwrap();

        assert_eq!(schedule.fractions, vec![0.25; 4]);
        assert_eq!(schedule.status, ScheduleStatus::Uniform);
        assert!(schedule.objective.is_finite());
    }

    #[test]
    fn test_zero_horizon_clamped() {
        assert_eq!(UniformSchedule::fractions(0), vec![1.0]);
    }
}
