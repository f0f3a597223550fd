//! Hedge optimizer facade
//!
//! Wraps a [`ScheduleSolver`] so that a failed solve never aborts the
//! caller: errors are logged and the uniform schedule is returned instead,
//! flagged [`ScheduleStatus::Fallback`].

use super::solvers::{ProjectedGradientSolver, ScheduleSolver, UniformSchedule};
use crate::domain::{HedgeProblem, HedgeSchedule, ScheduleStatus};
use log::warn;

pub struct HedgeOptimizer {
    solver: Box<dyn ScheduleSolver>,
}

impl HedgeOptimizer {
    pub fn new(solver: Box<dyn ScheduleSolver>) -> Self {
        Self { solver }
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Solve, substituting the uniform schedule on failure
    pub fn optimize(&self, problem: &HedgeProblem, cost: &dyn Fn(f64) -> f64) -> HedgeSchedule {
        match self.solver.solve(problem, cost) {
            Ok(schedule) => schedule,
            Err(err) => {
                warn!(
                    "{} failed for |z|={:.4} over {} steps: {}; using uniform schedule",
                    self.solver.name(),
                    problem.inventory,
                    problem.horizon,
                    err
                );
                UniformSchedule::build(problem, cost, ScheduleStatus::Fallback)
            }
        }
    }
}

impl Default for HedgeOptimizer {
    fn default() -> Self {
        Self::new(Box::new(ProjectedGradientSolver::default()))
    }
}

impl std::fmt::Debug for HedgeOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HedgeOptimizer")
            .field("solver", &self.solver.name())
            .finish()
    }
}
