//! Step log
//!
//! Everything an external consumer (plots, sweeps) needs from a run,
//! serialisable with serde.

use crate::error::Result;
use dealer_core::{InvestorId, MarketMakerId, RewardComponents, Trade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One market maker at the end of a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMakerSnapshot {
    pub id: MarketMakerId,
    pub inventory: f64,
    /// Rewards booked in this step
    pub rewards: RewardComponents,
    /// Rewards booked since the start of the run
    pub cumulative: RewardComponents,
    /// Client volume made since the start of the run
    pub client_volume: f64,
    /// Tier each investor was quoted at during the step
    pub tiers: BTreeMap<InvestorId, usize>,
}

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u64,
    pub mid_price: f64,
    pub reference_spread: f64,
    /// Client trades first (investor order), then hedges (market maker order)
    pub trades: Vec<Trade>,
    /// Indexed by market maker id
    pub market_makers: Vec<MarketMakerSnapshot>,
}

impl StepRecord {
    pub fn market_maker(&self, id: MarketMakerId) -> Option<&MarketMakerSnapshot> {
        self.market_makers.get(id.index())
    }

    pub fn client_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|trade| trade.is_client())
    }

    pub fn hedge_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|trade| trade.is_hedge())
    }
}

/// What happened to position revenue still pending when the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingDisposition {
    /// Dropped without being recognised
    #[default]
    Discarded,
}

/// Pending revenue of one market maker at termination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnmaturedRevenue {
    pub market_maker: MarketMakerId,
    pub entries: usize,
    /// Net signed volume whose revenue was never recognised
    pub net_volume: f64,
}

/// Complete output of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationLog {
    pub seed: u64,
    pub records: Vec<StepRecord>,
    pub pending_disposition: PendingDisposition,
    pub unmatured: Vec<UnmaturedRevenue>,
}

impl SimulationLog {
    pub fn num_steps(&self) -> usize {
        self.records.len()
    }

    /// Cumulative rewards of a market maker at the end of the run
    pub fn final_rewards(&self, id: MarketMakerId) -> Option<RewardComponents> {
        self.records
            .last()
            .and_then(|record| record.market_maker(id))
            .map(|snapshot| snapshot.cumulative)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealer_core::{Participant, Side, TradeId, TradeKind};

    fn record() -> StepRecord {
        let client = Trade::new(
            TradeId(1),
            1,
            TradeKind::Client,
            Participant::Investor(InvestorId(0)),
            Participant::Dealer(MarketMakerId(0)),
            Side::Buy,
            10.0,
            1e-4,
            100.0,
        );
        let hedge = Trade::new(
            TradeId(2),
            1,
            TradeKind::Hedge,
            Participant::Dealer(MarketMakerId(0)),
            Participant::Dealer(MarketMakerId(1)),
            Side::Buy,
            5.0,
            2e-4,
            100.0,
        );
        StepRecord {
            step: 1,
            mid_price: 100.0,
            reference_spread: 1.5e-4,
            trades: vec![client, hedge],
            market_makers: vec![MarketMakerSnapshot {
                id: MarketMakerId(0),
                inventory: -5.0,
                rewards: RewardComponents::default(),
                cumulative: RewardComponents {
                    spread_revenue: 0.1,
                    ..Default::default()
                },
                client_volume: 10.0,
                tiers: BTreeMap::from([(InvestorId(0), 4)]),
            }],
        }
    }

    #[test]
    fn test_trade_filters() {
        let record = record();
        assert_eq!(record.client_trades().count(), 1);
        assert_eq!(record.hedge_trades().count(), 1);
        assert!(record.market_maker(MarketMakerId(0)).is_some());
        assert!(record.market_maker(MarketMakerId(1)).is_none());
    }

    #[test]
    fn test_json_output() {
        let log = SimulationLog {
            seed: 7,
            records: vec![record()],
            pending_disposition: PendingDisposition::Discarded,
            unmatured: vec![],
        };

        let json = log.to_json().unwrap();
        assert!(json.contains("\"pending_disposition\":\"discarded\""));
        assert!(json.contains("\"kind\":\"hedge\""));

        let parsed: SimulationLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.final_rewards(MarketMakerId(0)).unwrap().spread_revenue, 0.1);
        assert_eq!(parsed.num_steps(), 1);
    }
}
