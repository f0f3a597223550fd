//! Risk-adjusted hedging cost
//!
//! Minimize: E[C] + γ × √Var[C]
//!
//! Where (all in fractions of the inventory):
//! - E[C] = Σ |x_k| × c(|z| × |x_k|)
//! - Var[C] = σ² × Σ y_k²,  y_k = 1 - Σ_{j≤k} x_j
//!
//! Both terms are relative-price quantities per unit of inventory notional.

use super::HedgeProblem;

/// Objective for one [`HedgeProblem`] and cost curve `c(volume)`
pub struct VarObjective<'a> {
    problem: &'a HedgeProblem,
    cost: &'a dyn Fn(f64) -> f64,
}

impl<'a> VarObjective<'a> {
    pub fn new(problem: &'a HedgeProblem, cost: &'a dyn Fn(f64) -> f64) -> Self {
        Self { problem, cost }
    }

    pub fn problem(&self) -> &HedgeProblem {
        self.problem
    }

    /// Expected execution cost E[C]
    pub fn expected_cost(&self, fractions: &[f64]) -> f64 {
        let z = self.problem.inventory;
        fractions
            .iter()
            .map(|x| {
                let x = x.abs();
                if x == 0.0 { 0.0 } else { x * (self.cost)(z * x) }
            })
            .sum()
    }

    /// Exposure variance Var[C]
    pub fn variance(&self, fractions: &[f64]) -> f64 {
        let sigma = self.problem.volatility;
        let mut remaining = 1.0;
        let mut sum_sq = 0.0;
        for x in fractions {
            remaining -= x;
            sum_sq += remaining * remaining;
        }
        sigma * sigma * sum_sq
    }

    /// E[C] + γ √Var[C]
    pub fn value(&self, fractions: &[f64]) -> f64 {
        let expected = self.expected_cost(fractions);
        if self.problem.risk_aversion == 0.0 {
            return expected;
        }
        expected + self.problem.risk_aversion * self.variance(fractions).sqrt()
    }
}
