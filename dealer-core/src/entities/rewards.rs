//! Market maker reward decomposition
//!
//! total = spread revenue + position revenue - hedging cost - risk cost
//!
//! Costs are kept as non-negative magnitudes so that each component can be
//! plotted on its own without sign conventions leaking into the consumer.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Per-step (or cumulative) reward components for one market maker
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardComponents {
    /// Markup earned on client and inter-dealer flow where we were maker
    pub spread_revenue: f64,
    /// Delayed mark-to-market on positions taken `H` steps earlier
    pub position_revenue: f64,
    /// Spread paid to competitors when hedging (>= 0)
    pub hedging_cost: f64,
    /// Penalty for adverse inventory/price co-movement (>= 0)
    pub risk_cost: f64,
}

impl RewardComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net reward
    pub fn total(&self) -> f64 {
        self.spread_revenue + self.position_revenue - self.hedging_cost - self.risk_cost
    }

    /// Combined hedging and risk cost (what risk aversion trades off)
    pub fn hedging_and_risk_cost(&self) -> f64 {
        self.hedging_cost + self.risk_cost
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl Add for RewardComponents {
    type Output = RewardComponents;

    fn add(self, rhs: Self) -> Self::Output {
        RewardComponents {
            spread_revenue: self.spread_revenue + rhs.spread_revenue,
            position_revenue: self.position_revenue + rhs.position_revenue,
            hedging_cost: self.hedging_cost + rhs.hedging_cost,
            risk_cost: self.risk_cost + rhs.risk_cost,
        }
    }
}

impl AddAssign for RewardComponents {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
