//! Hedge Schedule Types

use serde::{Deserialize, Serialize};

/// How a schedule was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Iterative solver met its stopping criteria
    Optimized,
    /// Analytic trajectory
    ClosedForm,
    /// Uniform split requested explicitly
    Uniform,
    /// Uniform split substituted after a solver failure
    Fallback,
}

/// Fractions of the inventory to trade at each step of the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeSchedule {
    /// x_0 .. x_{N-1}, summing to one
    pub fractions: Vec<f64>,
    /// Objective value at `fractions` (NaN if it could not be evaluated)
    pub objective: f64,
    pub iterations: usize,
    pub status: ScheduleStatus,
    /// Name of the solver that produced the schedule
    pub solver: String,
}

impl HedgeSchedule {
    pub fn new(
        fractions: Vec<f64>,
        objective: f64,
        iterations: usize,
        status: ScheduleStatus,
        solver: impl Into<String>,
    ) -> Self {
        Self {
            fractions,
            objective,
            iterations,
            status,
            solver: solver.into(),
        }
    }

    /// Fraction to execute now (x_0)
    pub fn immediate_fraction(&self) -> f64 {
        self.fractions.first().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        self.status == ScheduleStatus::Fallback
    }

    /// Remaining fraction after each step (y_k)
    pub fn remaining(&self) -> Vec<f64> {
        let mut left = 1.0;
        self.fractions
            .iter()
            .map(|x| {
                left -= x;
                left
            })
            .collect()
    }
}
