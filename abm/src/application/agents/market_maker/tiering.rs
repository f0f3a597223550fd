//! Client tiering
//!
//! Investors are ranked by the yield they bring (EMA of revenue per unit
//! volume) and split into `K` tiers, tier 0 being the best. Trades update
//! the yield records immediately, but tiers only move when
//! [`TieringPolicy::refresh_tiers`] runs at the start of a step.

use crate::domain::YieldRecord;
use crate::error::{ConfigError, Result, SimulationError};
use dealer_core::InvestorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ranking key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    /// Revenue per unit volume
    #[default]
    Yield,
    /// Yield times mean trade size
    RevenueRate,
}

/// Tier of investors without history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultTier {
    /// K - 1
    #[default]
    Worst,
    Best,
    /// Must be below K
    Fixed(usize),
}

impl DefaultTier {
    pub fn validate(&self, num_tiers: usize) -> std::result::Result<(), ConfigError> {
        match *self {
            DefaultTier::Fixed(tier) if tier >= num_tiers => Err(ConfigError::invalid(
                "default_tier",
                format!("fixed tier {tier} out of range for {num_tiers} tiers"),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieringMode {
    #[default]
    Adaptive,
    /// Refresh is a no-op; tiers stay where they are
    Frozen,
}

#[derive(Debug, Clone)]
pub struct TieringPolicy {
    num_tiers: usize,
    ema_weight: f64,
    metric: RankingMetric,
    default_tier: DefaultTier,
    mode: TieringMode,
    records: BTreeMap<InvestorId, YieldRecord>,
    pinned: BTreeMap<InvestorId, usize>,
}

impl TieringPolicy {
    pub fn new(
        num_tiers: usize,
        ema_weight: f64,
        metric: RankingMetric,
        default_tier: DefaultTier,
        mode: TieringMode,
    ) -> Self {
        Self {
            num_tiers: num_tiers.max(1),
            ema_weight,
            metric,
            default_tier,
            mode,
            records: BTreeMap::new(),
            pinned: BTreeMap::new(),
        }
    }

    pub fn num_tiers(&self) -> usize {
        self.num_tiers
    }

    pub fn mode(&self) -> TieringMode {
        self.mode
    }

    /// Book one trade's revenue against the investor's yield
    pub fn record_trade(&mut self, investor: InvestorId, revenue: f64, volume: f64) {
        if volume == 0.0 {
            return;
        }
        let weight = self.ema_weight;
        self.records
            .entry(investor)
            .or_insert_with(|| YieldRecord::new(weight))
            .observe(revenue, volume);
    }

    /// Re-rank investors with history and reassign their tiers
    pub fn refresh_tiers(&mut self) {
        if self.mode == TieringMode::Frozen {
            return;
        }

        let metric = self.metric;
        let mut ranked: Vec<(InvestorId, f64)> = self
            .records
            .iter()
            .filter(|(_, record)| record.trade_count() > 0)
            .map(|(id, record)| {
                let key = match metric {
                    RankingMetric::Yield => record.yield_value(),
                    RankingMetric::RevenueRate => record.revenue_rate(),
                };
                (*id, key)
            })
            .collect();

        // Descending by key; equal keys keep ascending id
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let n = ranked.len();
        let k = self.num_tiers;
        for (rank, (id, _)) in ranked.into_iter().enumerate() {
            let tier = (rank * k / n).min(k - 1);
            if let Some(record) = self.records.get_mut(&id) {
                record.set_tier(tier);
            }
        }
    }

    pub fn default_tier(&self) -> usize {
        match self.default_tier {
            DefaultTier::Worst => self.num_tiers - 1,
            DefaultTier::Best => 0,
            DefaultTier::Fixed(tier) => tier,
        }
    }

    /// Tier used to quote `investor` right now
    pub fn tier_of(&self, investor: InvestorId) -> usize {
        if let Some(&tier) = self.pinned.get(&investor) {
            return tier;
        }
        self.records
            .get(&investor)
            .and_then(YieldRecord::tier)
            .unwrap_or_else(|| self.default_tier())
    }

    /// Override the investor's tier until unpinned
    pub fn pin_tier(&mut self, investor: InvestorId, tier: usize) -> Result<()> {
        if tier >= self.num_tiers {
            return Err(SimulationError::InvalidTier {
                tier,
                num_tiers: self.num_tiers,
            });
        }
        self.pinned.insert(investor, tier);
        Ok(())
    }

    pub fn unpin_tier(&mut self, investor: InvestorId) -> Option<usize> {
        self.pinned.remove(&investor)
    }

    pub fn record(&self, investor: InvestorId) -> Option<&YieldRecord> {
        self.records.get(&investor)
    }

    /// Current tier of every investor seen so far (traded or pinned)
    pub fn tier_snapshot(&self) -> BTreeMap<InvestorId, usize> {
        self.records
            .keys()
            .chain(self.pinned.keys())
            .map(|&id| (id, self.tier_of(id)))
            .collect()
    }
}
