//! Almgren-Chriss Closed-Form Schedule
//!
//! For a locally linear cost curve `c(v) ≈ c0 + η'·v` the expected cost is
//! quadratic in the fractions, and the minimiser of E[C] + λ·Var[C] follows
//!
//! q(τ) = sinh(κ(1-τ)) / sinh(κ),   κ = √(λσ²/η)
//!
//! with `η = η'·|z|` the impact coefficient in fraction units. The √Var term
//! of the hedge objective is mapped to an equivalent variance weight at the
//! uniform schedule: `λ = γ / (2·√Var_uniform)`.
//!
//! Shape depends on risk aversion:
//!
//! High γ (risk averse):     Low γ (risk neutral):
//!   ↑                         ↑
//!   │█                        │
//!   │██                       │
//!   │███                      │ ████████
//!   │████                     │ ████████
//!   └────→ step               └────────→ step
//!   (front-loaded)            (even)

use super::protocol::ScheduleSolver;
use super::simplex::project_onto_simplex;
use crate::domain::{HedgeProblem, HedgeSchedule, ScheduleStatus, VarObjective};
use crate::error::{Result, SolveError};

/// Closed-form sinh trajectory
#[derive(Debug, Clone, Copy, Default)]
pub struct AlmgrenChrissSolver;

impl AlmgrenChrissSolver {
    pub fn new() -> Self {
        Self
    }

    /// Impact coefficient η in fraction units, from the cost slope over one uniform slice
    fn impact_coefficient(problem: &HedgeProblem, cost: &dyn Fn(f64) -> f64) -> f64 {
        let slice = problem.inventory / problem.horizon as f64;
        if slice <= 0.0 {
            return 0.0;
        }
        let slope = (cost(slice) - cost(0.0)) / slice;
        slope * problem.inventory
    }

    /// Calculate κ (kappa) parameter
    fn kappa(problem: &HedgeProblem, eta: f64) -> f64 {
        let n = problem.horizon as f64;
        // √Σ y_k² for the uniform schedule: y_k = 1 - (k+1)/N
        let uniform_sq: f64 = (0..problem.horizon)
            .map(|k| {
                let y = 1.0 - (k + 1) as f64 / n;
                y * y
            })
            .sum();
        let uniform_std = problem.volatility * uniform_sq.sqrt();
        if uniform_std <= 0.0 {
            return 0.0;
        }

        let lambda = problem.risk_aversion / (2.0 * uniform_std);
        let sigma_sq = problem.volatility * problem.volatility;

        // κ = √(λσ²/η), expressed per unit of normalised time
        ((lambda * sigma_sq) / eta).sqrt() * n
    }

    /// Remaining fraction q(τ) = sinh(κ(1-τ)) / sinh(κ), overflow-safe
    fn optimal_trajectory(tau: f64, kappa: f64) -> f64 {
        if kappa < 1e-3 {
            // Low kappa → even distribution
            return 1.0 - tau;
        }
        // e^{-κτ} (1 - e^{-2κ(1-τ)}) / (1 - e^{-2κ})
        let numerator = -(-2.0 * kappa * (1.0 - tau)).exp_m1();
        let denominator = -(-2.0 * kappa).exp_m1();
        (-kappa * tau).exp() * numerator / denominator
    }
}

impl ScheduleSolver for AlmgrenChrissSolver {
    fn solve(&self, problem: &HedgeProblem, cost: &dyn Fn(f64) -> f64) -> Result<HedgeSchedule> {
        problem.validate()?;
        let n = problem.horizon;
        let objective = VarObjective::new(problem, cost);

        let eta = Self::impact_coefficient(problem, cost);
        if !eta.is_finite() {
            return Err(SolveError::NonFiniteObjective);
        }

        let mut fractions = if eta <= 0.0 {
            // Flat or concave cost: only risk matters
            let mut x = vec![0.0; n];
            if problem.risk_aversion > 0.0 && problem.volatility > 0.0 {
                x[0] = 1.0;
            } else {
                x.iter_mut().for_each(|v| *v = 1.0 / n as f64);
            }
            x
        } else {
            let kappa = Self::kappa(problem, eta);
            (0..n)
                .map(|k| {
                    let tau = k as f64 / n as f64;
                    let tau_next = (k + 1) as f64 / n as f64;
                    Self::optimal_trajectory(tau, kappa) - Self::optimal_trajectory(tau_next, kappa)
                })
                .collect()
        };

        // Normalize fractions (handle numerical errors)
        let total: f64 = fractions.iter().sum();
        fractions.iter_mut().for_each(|x| *x /= total);

        if fractions.iter().any(|x| *x < problem.min_fraction) {
            project_onto_simplex(&mut fractions, problem.min_fraction);
        }

        let value = objective.value(&fractions);
        if !value.is_finite() {
            return Err(SolveError::NonFiniteObjective);
        }

        Ok(HedgeSchedule::new(fractions, value, 0, ScheduleStatus::ClosedForm, self.name()))
    }

    fn name(&self) -> &str {
        "almgren_chriss"
    }
}
