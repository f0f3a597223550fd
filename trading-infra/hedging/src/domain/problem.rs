//! Hedge Problem Definition

use crate::error::{Result, SolveError};
use serde::{Deserialize, Serialize};

/// One hedge decision: how to spread `inventory` over `horizon` steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeProblem {
    /// Absolute inventory to liquidate (|z|); direction is handled by the caller
    pub inventory: f64,
    /// Number of schedule steps N_max (>= 1)
    pub horizon: usize,
    /// Risk aversion γ (0 = expected cost only)
    pub risk_aversion: f64,
    /// Per-step relative price volatility σ
    pub volatility: f64,
    /// Lower bound on every fraction; negative values allow reversals
    pub min_fraction: f64,
}

impl HedgeProblem {
    pub fn new(inventory: f64, horizon: usize, risk_aversion: f64, volatility: f64) -> Self {
        Self {
            inventory: inventory.abs(),
            horizon,
            risk_aversion,
            volatility,
            min_fraction: 0.0,
        }
    }

    pub fn with_min_fraction(mut self, min_fraction: f64) -> Self {
        self.min_fraction = min_fraction;
        self
    }

    /// Budget left for the simplex once every fraction sits at its lower bound
    pub(crate) fn free_mass(&self) -> f64 {
        1.0 - self.horizon as f64 * self.min_fraction
    }

    pub fn validate(&self) -> Result<()> {
        if !self.inventory.is_finite() || self.inventory < 0.0 {
            return Err(SolveError::InvalidProblem(format!(
                "inventory must be finite and non-negative, got {}",
                self.inventory
            )));
        }
        if self.horizon == 0 {
            return Err(SolveError::InvalidProblem("horizon must be at least 1".into()));
        }
        if !self.risk_aversion.is_finite() || self.risk_aversion < 0.0 {
            return Err(SolveError::InvalidProblem(format!(
                "risk aversion must be finite and non-negative, got {}",
                self.risk_aversion
            )));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(SolveError::InvalidProblem(format!(
                "volatility must be finite and non-negative, got {}",
                self.volatility
            )));
        }
        if !self.min_fraction.is_finite() || self.free_mass() < 0.0 {
            return Err(SolveError::InvalidProblem(format!(
                "min fraction {} infeasible over {} steps",
                self.min_fraction, self.horizon
            )));
        }
        Ok(())
    }
}
