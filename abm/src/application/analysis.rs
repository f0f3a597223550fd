//! Post-run analysis
//!
//! Pure functions over step records: the series external plotting and
//! parameter sweeps consume.

use crate::application::simulation::StepRecord;
use dealer_core::{InvestorId, MarketMakerId, RewardComponents};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selects one reward component (or the total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardComponent {
    SpreadRevenue,
    PositionRevenue,
    HedgingCost,
    RiskCost,
    Total,
}

impl RewardComponent {
    pub fn of(&self, rewards: &RewardComponents) -> f64 {
        match self {
            RewardComponent::SpreadRevenue => rewards.spread_revenue,
            RewardComponent::PositionRevenue => rewards.position_revenue,
            RewardComponent::HedgingCost => rewards.hedging_cost,
            RewardComponent::RiskCost => rewards.risk_cost,
            RewardComponent::Total => rewards.total(),
        }
    }
}

fn normalize<K: Ord + Copy>(volumes: &mut BTreeMap<K, f64>) {
    let total: f64 = volumes.values().sum();
    if total > 0.0 {
        for volume in volumes.values_mut() {
            *volume /= total;
        }
    }
}

/// Share of client volume won by each market maker
///
/// Every market maker in the records appears; shares are all zero when no
/// client trade happened.
pub fn market_share(records: &[StepRecord]) -> BTreeMap<MarketMakerId, f64> {
    let mut volumes: BTreeMap<MarketMakerId, f64> = records
        .first()
        .map(|r| r.market_makers.iter().map(|s| (s.id, 0.0)).collect())
        .unwrap_or_default();

    for trade in records.iter().flat_map(|r| r.client_trades()) {
        if let Some(mm) = trade.maker.dealer() {
            *volumes.entry(mm).or_insert(0.0) += trade.volume();
        }
    }

    normalize(&mut volumes);
    volumes
}

/// Market share computed separately for each investor's flow
pub fn market_share_by_investor(
    records: &[StepRecord],
) -> BTreeMap<InvestorId, BTreeMap<MarketMakerId, f64>> {
    let mut by_investor: BTreeMap<InvestorId, BTreeMap<MarketMakerId, f64>> = BTreeMap::new();

    for trade in records.iter().flat_map(|r| r.client_trades()) {
        if let (Some(investor), Some(mm)) = (trade.investor(), trade.maker.dealer()) {
            *by_investor
                .entry(investor)
                .or_default()
                .entry(mm)
                .or_insert(0.0) += trade.volume();
        }
    }

    for volumes in by_investor.values_mut() {
        normalize(volumes);
    }
    by_investor
}

/// `|z_t|` over cumulative client volume, per step
///
/// Near 1 when client flow is kept on the book; low when it nets out or is
/// hedged away. Steps before the first client trade read 1.
pub fn internalization_series(records: &[StepRecord], market_maker: MarketMakerId) -> Vec<f64> {
    records
        .iter()
        .filter_map(|record| record.market_maker(market_maker))
        .map(|snapshot| {
            if snapshot.client_volume > 0.0 {
                snapshot.inventory.abs() / snapshot.client_volume
            } else {
                1.0
            }
        })
        .collect()
}

/// Cumulative value of one reward component, per step
pub fn cumulative_series(
    records: &[StepRecord],
    market_maker: MarketMakerId,
    component: RewardComponent,
) -> Vec<f64> {
    records
        .iter()
        .filter_map(|record| record.market_maker(market_maker))
        .map(|snapshot| component.of(&snapshot.cumulative))
        .collect()
}
