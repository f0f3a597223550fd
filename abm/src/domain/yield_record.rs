//! Per-investor yield bookkeeping kept by each market maker

use dealer_core::{Ema, RunningMean};
use serde::{Deserialize, Serialize};

/// Yield history of one investor, as seen by one market maker
///
/// The yield EMA and volume estimate move with every trade; `tier` is only
/// written by the once-per-step refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldRecord {
    yield_ema: Ema,
    volume: RunningMean,
    tier: Option<usize>,
}

impl YieldRecord {
    pub fn new(ema_weight: f64) -> Self {
        Self {
            yield_ema: Ema::with_weight(ema_weight),
            volume: RunningMean::new(),
            tier: None,
        }
    }

    /// Record one trade; zero or non-finite volume is ignored
    pub fn observe(&mut self, revenue: f64, volume: f64) -> bool {
        let volume = volume.abs();
        if volume == 0.0 || !volume.is_finite() || !revenue.is_finite() {
            return false;
        }
        self.yield_ema.update(revenue / volume);
        self.volume.push(volume);
        true
    }

    /// EMA of revenue per unit volume
    pub fn yield_value(&self) -> f64 {
        self.yield_ema.value().unwrap_or(0.0)
    }

    pub fn mean_volume(&self) -> f64 {
        self.volume.mean().unwrap_or(0.0)
    }

    /// Yield scaled by typical trade size
    pub fn revenue_rate(&self) -> f64 {
        self.yield_value() * self.mean_volume()
    }

    pub fn trade_count(&self) -> u64 {
        self.volume.count()
    }

    pub fn tier(&self) -> Option<usize> {
        self.tier
    }

    pub(crate) fn set_tier(&mut self, tier: usize) {
        self.tier = Some(tier);
    }
}
