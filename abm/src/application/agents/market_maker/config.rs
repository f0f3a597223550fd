//! Market Maker Configuration

use super::tiering::{DefaultTier, RankingMetric, TieringMode};
use crate::error::ConfigError;
use hedging::{
    AlmgrenChrissSolver, ProjectedGradientConfig, ProjectedGradientSolver, ScheduleSolver,
    UniformSchedule,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hedge schedule solver selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SolverKind {
    /// Numeric minimisation over the simplex
    ProjectedGradient {
        max_iterations: usize,
        /// Wall-clock budget per solve (ms)
        time_budget_ms: Option<u64>,
    },
    /// Closed-form sinh trajectory
    AlmgrenChriss,
    /// Always 1/N
    Uniform,
}

impl Default for SolverKind {
    fn default() -> Self {
        SolverKind::ProjectedGradient {
            max_iterations: 200,
            time_budget_ms: None,
        }
    }
}

impl SolverKind {
    pub fn build(&self) -> Box<dyn ScheduleSolver> {
        match *self {
            SolverKind::ProjectedGradient {
                max_iterations,
                time_budget_ms,
            } => Box::new(ProjectedGradientSolver::new(ProjectedGradientConfig {
                max_iterations,
                time_budget: time_budget_ms.map(Duration::from_millis),
                ..Default::default()
            })),
            SolverKind::AlmgrenChriss => Box::new(AlmgrenChrissSolver::new()),
            SolverKind::Uniform => Box::new(UniformSchedule),
        }
    }
}

/// Configuration for one market maker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketMakerConfig {
    /// Exponent α applied to the reference curve (>= 1)
    pub alpha: f64,

    /// Spread add-on per tier δ
    pub tier_penalty: f64,

    /// Constant spread add-on (0 for a competitive dealer)
    pub markup: f64,

    pub tiering_mode: TieringMode,
    pub ranking_metric: RankingMetric,

    /// Tier for investors without trade history
    pub default_tier: DefaultTier,

    pub hedging_enabled: bool,

    /// Risk aversion γ of the hedge objective
    pub risk_aversion: f64,

    /// Hedge schedule length N_max
    pub hedge_horizon: usize,

    /// Inventory and hedge sizes below this are not traded
    pub min_hedge_volume: f64,

    /// Lower bound on hedge fractions (negative allows reversals)
    pub min_hedge_fraction: f64,

    pub solver: SolverKind,
}

impl Default for MarketMakerConfig {
    fn default() -> Self {
        Self {
            alpha: 1.5,
            tier_penalty: 1e-4,
            markup: 0.0,
            tiering_mode: TieringMode::Adaptive,
            ranking_metric: RankingMetric::Yield,
            default_tier: DefaultTier::Worst,
            hedging_enabled: true,
            risk_aversion: 0.5,
            hedge_horizon: 20,
            min_hedge_volume: 1e-4,
            min_hedge_fraction: 0.0,
            solver: SolverKind::default(),
        }
    }
}

impl MarketMakerConfig {
    /// A dealer whose quotes never win
    pub fn unreachable() -> Self {
        Self {
            markup: 1e9,
            ..Default::default()
        }
    }

    /// Set risk aversion (builder pattern)
    pub fn with_risk_aversion(mut self, gamma: f64) -> Self {
        self.risk_aversion = gamma;
        self
    }

    /// Set solver (builder pattern)
    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    /// Set tiering mode (builder pattern)
    pub fn with_tiering_mode(mut self, mode: TieringMode) -> Self {
        self.tiering_mode = mode;
        self
    }

    /// Set default tier policy (builder pattern)
    pub fn with_default_tier(mut self, default_tier: DefaultTier) -> Self {
        self.default_tier = default_tier;
        self
    }

    pub fn without_hedging(mut self) -> Self {
        self.hedging_enabled = false;
        self
    }

    /// Checks that do not depend on the pricing invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.risk_aversion.is_finite() && self.risk_aversion >= 0.0) {
            return Err(ConfigError::invalid(
                "risk_aversion",
                format!("must be non-negative, got {}", self.risk_aversion),
            ));
        }
        if self.hedge_horizon == 0 {
            return Err(ConfigError::invalid("hedge_horizon", "must be at least 1"));
        }
        if !(self.min_hedge_volume.is_finite() && self.min_hedge_volume >= 0.0) {
            return Err(ConfigError::invalid(
                "min_hedge_volume",
                format!("must be non-negative, got {}", self.min_hedge_volume),
            ));
        }
        let free_mass = 1.0 - self.hedge_horizon as f64 * self.min_hedge_fraction;
        if !(self.min_hedge_fraction.is_finite() && free_mass >= 0.0) {
            return Err(ConfigError::invalid(
                "min_hedge_fraction",
                format!(
                    "{} is infeasible over {} steps",
                    self.min_hedge_fraction, self.hedge_horizon
                ),
            ));
        }
        if let SolverKind::ProjectedGradient { max_iterations: 0, .. } = self.solver {
            return Err(ConfigError::invalid("solver.max_iterations", "must be at least 1"));
        }
        Ok(())
    }
}
