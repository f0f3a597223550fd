//! Market Maker Agent
//!
//! A dealer quoting tiered spreads to investors and hedging its inventory
//! against competing dealers.
//!
//! # Per-step lifecycle (driven by the engine)
//!
//! 1. `begin_step` and `refresh_tiers`
//! 2. `quote` / `apply_trade` for client flow
//! 3. `compute_hedge`, then `apply_trade` for the hedge
//! 4. `realize_positions`, `assess_risk`, `end_step`
//!
//! # Revenue sources
//!
//! - spread revenue: `s·|v|·P` earned on every trade it makes
//! - position revenue: `v·(P_{t0+H} - P_{t0})`, recognised `H` steps late
//! - hedging cost: spread paid when it takes a competitor's quote
//! - risk cost: `max(-z_{t-1}·ΔP, 0)`

mod config;
pub mod pricing;
pub mod tiering;
mod venue;

pub use config::{MarketMakerConfig, SolverKind};
pub use pricing::PricingPolicy;
pub use tiering::{DefaultTier, RankingMetric, TieringMode, TieringPolicy};
pub use venue::{ExchangeVenue, HedgeVenue};

use crate::domain::{MarketState, PendingRevenue, RewardLedger};
use crate::error::{ConfigError, Result, SimulationError};
use dealer_core::{InvestorId, MarketMakerId, Participant, RewardComponents, Side, Trade};
use hedging::{HedgeOptimizer, HedgeProblem, ScheduleStatus};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeMap;

/// Immediate slice of a hedge schedule, ready to execute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeOrder {
    /// Volume to trade now (> 0)
    pub volume: f64,
    /// Side taken by the hedging market maker
    pub side: Side,
    pub venue: Participant,
    /// Spread quoted by the venue for `volume`
    pub spread: f64,
    /// Schedule fraction x_0
    pub fraction: f64,
    pub status: ScheduleStatus,
}

impl HedgeOrder {
    pub fn signed_volume(&self) -> f64 {
        self.side.sign() * self.volume
    }
}

#[derive(Debug)]
pub struct MarketMaker {
    id: MarketMakerId,
    config: MarketMakerConfig,
    pricing: PricingPolicy,
    tiering: TieringPolicy,
    optimizer: HedgeOptimizer,
    interdealer_tier: Option<usize>,

    inventory: f64,
    last_step_inventory: f64,
    step_rewards: RewardComponents,
    cumulative: RewardComponents,
    client_volume: f64,
    client_trades: u64,
    hedge_trades: u64,
    ledger: RewardLedger,
}

impl MarketMaker {
    pub fn new(
        id: MarketMakerId,
        config: MarketMakerConfig,
        num_tiers: usize,
        ema_weight: f64,
        revenue_delay: u64,
        interdealer_tier: Option<usize>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        if let Some(tier) = interdealer_tier.filter(|&tier| tier >= num_tiers) {
            return Err(ConfigError::invalid(
                "interdealer_tier",
                format!("tier {tier} out of range for {num_tiers} tiers"),
            ));
        }
        config.default_tier.validate(num_tiers)?;

        let pricing = PricingPolicy::new(id, &config)?;
        let tiering = TieringPolicy::new(
            num_tiers,
            ema_weight,
            config.ranking_metric,
            config.default_tier,
            config.tiering_mode,
        );
        let optimizer = HedgeOptimizer::new(config.solver.build());

        Ok(Self {
            id,
            pricing,
            tiering,
            optimizer,
            interdealer_tier,
            inventory: 0.0,
            last_step_inventory: 0.0,
            step_rewards: RewardComponents::default(),
            cumulative: RewardComponents::default(),
            client_volume: 0.0,
            client_trades: 0,
            hedge_trades: 0,
            ledger: RewardLedger::new(revenue_delay),
            config,
        })
    }

    pub fn id(&self) -> MarketMakerId {
        self.id
    }

    pub fn config(&self) -> &MarketMakerConfig {
        &self.config
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    pub fn tiering(&self) -> &TieringPolicy {
        &self.tiering
    }

    pub fn ledger(&self) -> &RewardLedger {
        &self.ledger
    }

    /// Net inventory z
    pub fn inventory(&self) -> f64 {
        self.inventory
    }

    /// Inventory at the end of the previous step
    pub fn last_step_inventory(&self) -> f64 {
        self.last_step_inventory
    }

    pub fn step_rewards(&self) -> RewardComponents {
        self.step_rewards
    }

    pub fn cumulative_rewards(&self) -> RewardComponents {
        self.cumulative
    }

    /// Total client volume made so far
    pub fn client_volume(&self) -> f64 {
        self.client_volume
    }

    pub fn client_trades(&self) -> u64 {
        self.client_trades
    }

    /// Hedges this market maker initiated
    pub fn hedge_trades(&self) -> u64 {
        self.hedge_trades
    }

    // =========================================================================
    // Quoting
    // =========================================================================

    pub fn tier_of(&self, investor: InvestorId) -> usize {
        self.tiering.tier_of(investor)
    }

    pub fn tier_snapshot(&self) -> BTreeMap<InvestorId, usize> {
        self.tiering.tier_snapshot()
    }

    /// Client quote at the investor's current tier
    pub fn quote(&self, market: &MarketState, investor: InvestorId, volume: f64) -> Result<f64> {
        self.pricing.quote(market, volume, self.tiering.tier_of(investor))
    }

    /// Quote offered to competing dealers
    pub fn dealer_quote(&self, market: &MarketState, volume: f64) -> Result<f64> {
        let tier = self
            .interdealer_tier
            .unwrap_or_else(|| self.tiering.default_tier());
        self.pricing.quote(market, volume, tier)
    }

    pub fn refresh_tiers(&mut self) {
        self.tiering.refresh_tiers();
    }

    pub fn pin_tier(&mut self, investor: InvestorId, tier: usize) -> Result<()> {
        self.tiering.pin_tier(investor, tier)
    }

    pub fn unpin_tier(&mut self, investor: InvestorId) -> Option<usize> {
        self.tiering.unpin_tier(investor)
    }

    // =========================================================================
    // Trades
    // =========================================================================

    /// Book a trade this market maker is party to; returns false otherwise
    pub fn apply_trade(&mut self, trade: &Trade) -> bool {
        let Some(signed_volume) = trade.signed_volume_for(self.id) else {
            return false;
        };

        self.inventory += signed_volume;
        self.ledger.enqueue(PendingRevenue {
            trade_id: trade.id,
            origin_step: trade.step,
            signed_volume,
            origin_price: trade.mid_price,
        });

        let notional = trade.spread_notional();
        if trade.maker.is_dealer(self.id) {
            self.step_rewards.spread_revenue += notional;
            if let Some(investor) = trade.investor() {
                self.tiering.record_trade(investor, notional, trade.volume());
                self.client_volume += trade.volume();
                self.client_trades += 1;
            }
        } else {
            self.step_rewards.hedging_cost += notional;
            self.hedge_trades += 1;
        }
        true
    }

    // =========================================================================
    // Hedging
    // =========================================================================

    /// Immediate hedge for the current inventory, if any
    ///
    /// The schedule is optimised against the cheapest venue at every volume;
    /// the order goes to whichever venue is cheapest for the slice itself.
    pub fn compute_hedge(
        &self,
        market: &MarketState,
        venues: &[&dyn HedgeVenue],
    ) -> Result<Option<HedgeOrder>> {
        let z = self.inventory;
        let threshold = self.config.min_hedge_volume;
        if !self.config.hedging_enabled || venues.is_empty() || z == 0.0 || z.abs() < threshold {
            return Ok(None);
        }
        let Some(mut side) = Side::reducing(z) else {
            return Ok(None);
        };

        let failure: Cell<Option<SimulationError>> = Cell::new(None);
        let cost = |volume: f64| {
            let mut best = f64::INFINITY;
            for venue in venues {
                match venue.hedge_quote(market, volume) {
                    Ok(quote) => best = best.min(quote),
                    Err(err) => {
                        failure.set(Some(err));
                        return f64::NAN;
                    }
                }
            }
            best
        };

        let problem = HedgeProblem::new(
            z.abs(),
            self.config.hedge_horizon,
            self.config.risk_aversion,
            market.per_step_volatility,
        )
        .with_min_fraction(self.config.min_hedge_fraction);
        let schedule = self.optimizer.optimize(&problem, &cost);
        if let Some(err) = failure.take() {
            return Err(err);
        }

        let fraction = schedule.immediate_fraction();
        let mut volume = fraction * z.abs();
        if volume < 0.0 {
            side = side.opposite();
            volume = -volume;
        }
        if volume == 0.0 || volume < threshold {
            return Ok(None);
        }

        let mut best: Option<(Participant, f64)> = None;
        for venue in venues {
            let spread = venue.hedge_quote(market, volume)?;
            if best.is_none_or(|(_, current)| spread < current) {
                best = Some((venue.participant(), spread));
            }
        }
        let Some((venue, spread)) = best else {
            return Ok(None);
        };

        debug!(
            "{} hedges {:.4} of z={:.4} ({} {}, x0={:.4}, {:?})",
            self.id, volume, z, side, venue, fraction, schedule.status
        );

        Ok(Some(HedgeOrder {
            volume,
            side,
            venue,
            spread,
            fraction,
            status: schedule.status,
        }))
    }

    // =========================================================================
    // Step bookkeeping
    // =========================================================================

    pub fn begin_step(&mut self) {
        self.step_rewards = RewardComponents::default();
    }

    /// Recognise delayed position revenue maturing at `step`
    pub fn realize_positions(&mut self, step: u64, mid_price: f64) -> f64 {
        let revenue = self.ledger.mature(step, mid_price);
        self.step_rewards.position_revenue += revenue;
        revenue
    }

    /// Charge the loss on last step's inventory, if the move went against it
    pub fn assess_risk(&mut self, mid_price: f64, previous_mid: f64) -> f64 {
        let cost = (-self.last_step_inventory * (mid_price - previous_mid)).max(0.0);
        self.step_rewards.risk_cost += cost;
        cost
    }

    /// Close the step and return its rewards
    pub fn end_step(&mut self) -> RewardComponents {
        self.cumulative += self.step_rewards;
        self.last_step_inventory = self.inventory;
        self.step_rewards
    }

    /// Remove revenue that will never mature
    pub fn drain_unmatured(&mut self) -> Vec<PendingRevenue> {
        self.ledger.drain_unmatured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReferenceCurve;
    use approx::assert_relative_eq;
    use dealer_core::{TradeId, TradeKind};

    fn market() -> MarketState {
        MarketState {
            step: 1,
            mid_price: 100.0,
            previous_mid: 100.0,
            per_step_volatility: 6.4e-4,
            curve: ReferenceCurve::new(1.5e-4, 1.6, 10_000.0).unwrap(),
        }
    }

    fn maker(id: u32, config: MarketMakerConfig) -> MarketMaker {
        MarketMaker::new(MarketMakerId(id), config, 5, 0.1, 4, None).unwrap()
    }

    fn client_trade(id: u64, mm: u32, side: Side, volume: f64, spread: f64) -> Trade {
        Trade::new(
            TradeId(id),
            1,
            TradeKind::Client,
            Participant::Investor(InvestorId(0)),
            Participant::Dealer(MarketMakerId(mm)),
            side,
            volume,
            spread,
            100.0,
        )
    }

    #[test]
    fn test_client_trade_bookkeeping() {
        let mut mm = maker(0, MarketMakerConfig::default());
        assert!(mm.apply_trade(&client_trade(1, 0, Side::Buy, 50.0, 2e-4)));

        // Investor bought, dealer is short
        assert_eq!(mm.inventory(), -50.0);
        assert_relative_eq!(mm.step_rewards().spread_revenue, 2e-4 * 50.0 * 100.0);
        assert_eq!(mm.client_trades(), 1);
        assert_eq!(mm.client_volume(), 50.0);
        assert_eq!(mm.ledger().pending_len(), 1);
        assert!(mm.tiering().record(InvestorId(0)).is_some());

        // Not a counterparty
        assert!(!mm.apply_trade(&client_trade(2, 1, Side::Buy, 50.0, 2e-4)));
        assert_eq!(mm.inventory(), -50.0);
    }

    #[test]
    fn test_hedge_taker_pays_spread() {
        let mut mm = maker(0, MarketMakerConfig::default());
        let hedge = Trade::new(
            TradeId(1),
            1,
            TradeKind::Hedge,
            Participant::Dealer(MarketMakerId(0)),
            Participant::Dealer(MarketMakerId(1)),
            Side::Sell,
            20.0,
            3e-4,
            100.0,
        );
        mm.apply_trade(&hedge);
        assert_eq!(mm.inventory(), -20.0);
        assert_relative_eq!(mm.step_rewards().hedging_cost, 3e-4 * 20.0 * 100.0);
        assert_eq!(mm.step_rewards().spread_revenue, 0.0);
        assert_eq!(mm.hedge_trades(), 1);
    }

    #[test]
    fn test_no_hedge_when_flat() {
        let mm = maker(0, MarketMakerConfig::default());
        let other = maker(1, MarketMakerConfig::default());
        assert!(mm.compute_hedge(&market(), &[&other]).unwrap().is_none());
    }

    #[test]
    fn test_no_hedge_when_disabled_or_no_venue() {
        let mut mm = maker(0, MarketMakerConfig::default().without_hedging());
        mm.apply_trade(&client_trade(1, 0, Side::Buy, 100.0, 2e-4));
        let other = maker(1, MarketMakerConfig::default());
        assert!(mm.compute_hedge(&market(), &[&other]).unwrap().is_none());

        let mut mm = maker(0, MarketMakerConfig::default());
        mm.apply_trade(&client_trade(1, 0, Side::Buy, 100.0, 2e-4));
        assert!(mm.compute_hedge(&market(), &[]).unwrap().is_none());
    }

    #[test]
    fn test_hedge_reduces_inventory() {
        let config = MarketMakerConfig::default()
            .with_risk_aversion(1e6)
            .with_solver(SolverKind::AlmgrenChriss);
        let mut mm = maker(0, config);
        mm.apply_trade(&client_trade(1, 0, Side::Sell, 200.0, 2e-4));
        assert_eq!(mm.inventory(), 200.0);

        let other = maker(1, MarketMakerConfig::default());
        let order = mm.compute_hedge(&market(), &[&other]).unwrap().unwrap();
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.venue, Participant::Dealer(MarketMakerId(1)));
        assert!(order.volume > 0.0 && order.volume <= 200.0 + 1e-9);
        assert_relative_eq!(order.spread, other.dealer_quote(&market(), order.volume).unwrap());
        assert_relative_eq!(order.signed_volume(), -order.volume);
    }

    #[test]
    fn test_hedge_routes_to_cheapest_venue() {
        let mut mm = maker(0, MarketMakerConfig::default().with_solver(SolverKind::Uniform));
        mm.apply_trade(&client_trade(1, 0, Side::Buy, 400.0, 2e-4));

        let expensive = maker(1, MarketMakerConfig::unreachable());
        let cheap = maker(2, MarketMakerConfig::default());
        let order = mm.compute_hedge(&market(), &[&expensive, &cheap]).unwrap().unwrap();
        assert_eq!(order.venue, Participant::Dealer(MarketMakerId(2)));
        assert_eq!(order.side, Side::Buy);
        assert_relative_eq!(order.volume, 20.0, epsilon = 1e-9);
        assert_eq!(order.status, ScheduleStatus::Uniform);
    }

    #[test]
    fn test_exchange_venue_quotes_reference_cost() {
        let state = market();
        assert_eq!(ExchangeVenue.hedge_quote(&state, 250.0).unwrap(), state.reference_cost(250.0));
        assert_eq!(ExchangeVenue.participant(), Participant::Exchange);
    }

    #[test]
    fn test_step_rewards_and_risk() {
        let mut mm = maker(0, MarketMakerConfig::default());
        mm.begin_step();
        mm.apply_trade(&client_trade(1, 1, Side::Buy, 10.0, 1e-4));
        // Not party to it
        assert_eq!(mm.inventory(), 0.0);

        mm.apply_trade(&client_trade(2, 0, Side::Sell, 10.0, 1e-4));
        let first = mm.end_step();
        assert_relative_eq!(first.spread_revenue, 0.1);
        assert_eq!(mm.last_step_inventory(), 10.0);

        // Long 10 into a 2.0 drop: risk cost 20
        mm.begin_step();
        assert_relative_eq!(mm.assess_risk(98.0, 100.0), 20.0);
        // Rally costs nothing
        assert_eq!(mm.assess_risk(101.0, 100.0), 0.0);
        let second = mm.end_step();
        assert_relative_eq!(second.risk_cost, 20.0);
        assert_relative_eq!(mm.cumulative_rewards().total(), 0.1 - 20.0);
    }

    #[test]
    fn test_positions_realise_after_delay() {
        let mut mm = maker(0, MarketMakerConfig::default());
        mm.apply_trade(&client_trade(1, 0, Side::Sell, 10.0, 1e-4));
        assert_eq!(mm.realize_positions(4, 103.0), 0.0);
        assert_relative_eq!(mm.realize_positions(5, 103.0), 30.0);
        assert!(mm.drain_unmatured().is_empty());
    }

    #[test]
    fn test_dealer_quote_uses_interdealer_tier() {
        let state = market();
        let default = maker(0, MarketMakerConfig::default());
        let best = MarketMaker::new(MarketMakerId(1), MarketMakerConfig::default(), 5, 0.1, 4, Some(0)).unwrap();
        assert_relative_eq!(
            default.dealer_quote(&state, 100.0).unwrap() - best.dealer_quote(&state, 100.0).unwrap(),
            4e-4,
            epsilon = 1e-15
        );

        assert!(MarketMaker::new(MarketMakerId(1), MarketMakerConfig::default(), 5, 0.1, 4, Some(5)).is_err());
    }
}
