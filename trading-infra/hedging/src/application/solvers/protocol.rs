//! Schedule Solver Protocol

use crate::domain::{HedgeProblem, HedgeSchedule};
use crate::error::Result;

/// Hedge schedule solver interface
///
/// `cost(volume)` is the per-unit spread paid to trade `volume` in one step.
/// Implementations must be thread-safe (Send + Sync) so replications can
/// share a configured solver.
pub trait ScheduleSolver: Send + Sync {
    /// Compute fractions `x_0..x_{N-1}` for the problem
    fn solve(&self, problem: &HedgeProblem, cost: &dyn Fn(f64) -> f64) -> Result<HedgeSchedule>;

    /// Get the solver name for logging/debugging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScheduleStatus;

    struct AllNow;

    impl ScheduleSolver for AllNow {
        fn solve(&self, problem: &HedgeProblem, _cost: &dyn Fn(f64) -> f64) -> Result<HedgeSchedule> {
            let mut fractions = vec![0.0; problem.horizon];
            fractions[0] = 1.0;
            Ok(HedgeSchedule::new(fractions, 0.0, 0, ScheduleStatus::ClosedForm, self.name()))
        }

        fn name(&self) -> &str {
            "all_now"
        }
    }

    #[test]
    fn test_trait_object_usable() {
        let solver: Box<dyn ScheduleSolver> = Box::new(AllNow);
        let problem = HedgeProblem::new(10.0, 3, 1.0, 0.01);
        let schedule = solver.solve(&problem, &|_| 1e-4).unwrap();

        assert_eq!(schedule.immediate_fraction(), 1.0);
        assert_eq!(schedule.solver, "all_now");
    }
}
