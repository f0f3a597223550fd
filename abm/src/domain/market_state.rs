//! Market state snapshot
//!
//! Read-only view of the exogenous market for one step. Only the market
//! process produces these; agents receive copies.

use super::ReferenceCurve;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Step the snapshot belongs to (0 before the first advance)
    pub step: u64,
    /// Mid-price P_t
    pub mid_price: f64,
    /// Mid-price P_{t-1}
    pub previous_mid: f64,
    /// σ·√Δt, relative per step
    pub per_step_volatility: f64,
    /// Reference cost curve for this step's reference spread
    pub curve: ReferenceCurve,
}

impl MarketState {
    #[inline]
    pub fn reference_spread(&self) -> f64 {
        self.curve.reference_spread()
    }

    /// Relative cost of trading `volume` against the outside book
    #[inline]
    pub fn reference_cost(&self, volume: f64) -> f64 {
        self.curve.cost(volume)
    }

    /// P_t - P_{t-1}
    #[inline]
    pub fn price_change(&self) -> f64 {
        self.mid_price - self.previous_mid
    }
}
