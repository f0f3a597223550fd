//! Projected Gradient Schedule Solver
//!
//! Black-box minimisation of the hedge objective over
//! `{x : Σx = 1, x_k >= min_fraction}` (spectral projected gradient):
//!
//! 1. Finite-difference gradient (one-sided at the lower bound)
//! 2. Direction `d = P(x - α·g) - x`, with `P` the projection onto the
//!    feasible simplex and `α` the Barzilai-Borwein step
//! 3. Nonmonotone Armijo backtracking along `d` against the worst of the
//!    last few objective values
//!
//! Runs from two starts (uniform and immediate liquidation) and keeps the
//! better result. The cost curve is only assumed to be evaluable.

use super::protocol::ScheduleSolver;
use super::simplex::project_onto_simplex;
use crate::domain::{HedgeProblem, HedgeSchedule, ScheduleStatus, VarObjective};
use crate::error::{Result, SolveError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MIN_SPECTRAL_STEP: f64 = 1e-30;
const MAX_SPECTRAL_STEP: f64 = 1e30;

/// Projected gradient configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedGradientConfig {
    /// Iteration cap per start point
    pub max_iterations: usize,
    /// Stop when the projected gradient (scaled by the objective) is this small
    pub stationarity_tolerance: f64,
    /// Stop when no coordinate moves by more than this
    pub step_tolerance: f64,
    /// Stop when an accepted step lowers the objective by less than this (relative)
    pub objective_tolerance: f64,
    /// Finite-difference step for the gradient
    pub gradient_step: f64,
    /// Armijo sufficient-decrease constant
    pub armijo: f64,
    /// Step halvings before the point is declared stationary
    pub max_backtracks: usize,
    /// Number of past objective values the line search compares against
    pub memory: usize,
    /// Optional wall-clock budget for the whole solve
    pub time_budget: Option<Duration>,
}

impl Default for ProjectedGradientConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            stationarity_tolerance: 1e-9,
            step_tolerance: 1e-12,
            objective_tolerance: 1e-12,
            gradient_step: 1e-7,
            armijo: 1e-4,
            max_backtracks: 50,
            memory: 10,
            time_budget: None,
        }
    }
}

/// Outcome of one descent run
struct Descent {
    point: Vec<f64>,
    value: f64,
    iterations: usize,
}

/// Projected gradient solver (default)
#[derive(Debug, Clone, Default)]
pub struct ProjectedGradientSolver {
    config: ProjectedGradientConfig,
}

fn max_abs(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0f64, |m, v| m.max(v.abs()))
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl ProjectedGradientSolver {
    pub fn new(config: ProjectedGradientConfig) -> Self {
        Self { config }
    }

    /// Create with a wall-clock budget
    pub fn with_time_budget(budget: Duration) -> Self {
        Self::new(ProjectedGradientConfig {
            time_budget: Some(budget),
            ..Default::default()
        })
    }

    pub fn config(&self) -> &ProjectedGradientConfig {
        &self.config
    }

    fn start_points(problem: &HedgeProblem) -> [Vec<f64>; 2] {
        let n = problem.horizon;
        let uniform = vec![1.0 / n as f64; n];

        let mut immediate = vec![problem.min_fraction; n];
        immediate[0] = 1.0 - (n - 1) as f64 * problem.min_fraction;

        [uniform, immediate]
    }

    fn gradient(&self, objective: &VarObjective<'_>, x: &[f64], value: f64) -> Result<Vec<f64>> {
        let h = self.config.gradient_step;
        let lower = objective.problem().min_fraction;
        let mut shifted = x.to_vec();

        let grad: Vec<f64> = (0..x.len())
            .map(|k| {
                let xk = x[k];
                shifted[k] = xk + h;
                let up = objective.value(&shifted);
                let derivative = if xk - h < lower {
                    (up - value) / h
                } else {
                    shifted[k] = xk - h;
                    let down = objective.value(&shifted);
                    (up - down) / (2.0 * h)
                };
                shifted[k] = xk;
                derivative
            })
            .collect();

        if grad.iter().all(|g| g.is_finite()) {
            Ok(grad)
        } else {
            Err(SolveError::NonFiniteObjective)
        }
    }

    /// `P(x - step·g) - x`
    fn projected_direction(x: &[f64], grad: &[f64], step: f64, lower: f64) -> Vec<f64> {
        let mut target: Vec<f64> = x.iter().zip(grad).map(|(xi, gi)| xi - step * gi).collect();
        project_onto_simplex(&mut target, lower);
        target.iter().zip(x).map(|(t, xi)| t - xi).collect()
    }

    fn descend(
        &self,
        objective: &VarObjective<'_>,
        start: Vec<f64>,
        started_at: Instant,
    ) -> Result<Descent> {
        let lower = objective.problem().min_fraction;
        let mut x = start;
        let mut value = objective.value(&x);
        if !value.is_finite() {
            return Err(SolveError::NonFiniteObjective);
        }
        let mut grad = self.gradient(objective, &x, value)?;

        let mut best = (x.clone(), value);
        let mut history: VecDeque<f64> = VecDeque::with_capacity(self.config.memory.max(1));
        history.push_back(value);

        let mut spectral = 0.5 / max_abs(grad.iter().copied()).max(f64::MIN_POSITIVE);

        for iteration in 1..=self.config.max_iterations {
            if let Some(budget) = self.config.time_budget {
                if started_at.elapsed() >= budget {
                    return Err(SolveError::BudgetExhausted { iterations: iteration });
                }
            }

            let done = |best: (Vec<f64>, f64)| {
                Ok(Descent {
                    point: best.0,
                    value: best.1,
                    iterations: iteration,
                })
            };

            // Stationarity, measured with the gradient relative to the objective
            let scale = value.abs().max(f64::MIN_POSITIVE);
            let measure = Self::projected_direction(&x, &grad, 1.0 / scale, lower);
            if max_abs(measure.into_iter()) <= self.config.stationarity_tolerance {
                return done(best);
            }

            let direction = Self::projected_direction(&x, &grad, spectral, lower);
            let slope = dot(&grad, &direction);
            if slope >= 0.0 || max_abs(direction.iter().copied()) <= self.config.step_tolerance {
                return done(best);
            }

            let reference = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mut lambda = 1.0;
            let mut accepted = None;
            for _ in 0..self.config.max_backtracks {
                let trial: Vec<f64> = x.iter().zip(&direction).map(|(xi, di)| xi + lambda * di).collect();
                let trial_value = objective.value(&trial);
                if trial_value.is_finite() && trial_value <= reference + self.config.armijo * lambda * slope {
                    accepted = Some((trial, trial_value));
                    break;
                }
                lambda *= 0.5;
            }

            // No admissible decrease: stationary up to numerical precision
            let Some((next, next_value)) = accepted else {
                return done(best);
            };
            let next_grad = self.gradient(objective, &next, next_value)?;

            let s: Vec<f64> = next.iter().zip(&x).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = next_grad.iter().zip(&grad).map(|(a, b)| a - b).collect();
            let sy = dot(&s, &y);
            spectral = if sy > 0.0 {
                (dot(&s, &s) / sy).clamp(MIN_SPECTRAL_STEP, MAX_SPECTRAL_STEP)
            } else {
                MAX_SPECTRAL_STEP
            };

            let moved = max_abs(s.into_iter());
            let decrease = value - next_value;

            x = next;
            value = next_value;
            grad = next_grad;

            if value < best.1 {
                best = (x.clone(), value);
            }
            if history.len() == self.config.memory.max(1) {
                history.pop_front();
            }
            history.push_back(value);

            if moved <= self.config.step_tolerance
                || (decrease >= 0.0 && decrease <= self.config.objective_tolerance * scale)
            {
                return done(best);
            }
        }

        Err(SolveError::NotConverged {
            iterations: self.config.max_iterations,
        })
    }
}

impl ScheduleSolver for ProjectedGradientSolver {
    fn solve(&self, problem: &HedgeProblem, cost: &dyn Fn(f64) -> f64) -> Result<HedgeSchedule> {
        problem.validate()?;
        let objective = VarObjective::new(problem, cost);

        if problem.horizon == 1 {
            let fractions = vec![1.0];
            let value = objective.value(&fractions);
            return Ok(HedgeSchedule::new(fractions, value, 0, ScheduleStatus::Optimized, self.name()));
        }

        let started_at = Instant::now();
        let mut best: Option<Descent> = None;
        let mut iterations = 0;
        let mut last_error = None;

        for start in Self::start_points(problem) {
            match self.descend(&objective, start, started_at) {
                Ok(run) => {
                    iterations += run.iterations;
                    // Later starts must be strictly better to displace earlier ones
                    let improves = match &best {
                        None => true,
                        Some(b) => run.value < b.value - 1e-12 * b.value.abs(),
                    };
                    if improves {
                        best = Some(run);
                    }
                }
                Err(err @ SolveError::BudgetExhausted { .. }) => return Err(err),
                Err(err) => last_error = Some(err),
            }
        }

        match (best, last_error) {
            (Some(run), _) => Ok(HedgeSchedule::new(
                run.point,
                run.value,
                iterations,
                ScheduleStatus::Optimized,
                self.name(),
            )),
            (None, Some(err)) => Err(err),
            (None, None) => Err(SolveError::NonFiniteObjective),
        }
    }

    fn name(&self) -> &str {
        "projected_gradient"
    }
}
