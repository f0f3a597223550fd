//! Simulation Engine
//!
//! Discrete-time orchestrator. Each step:
//!
//! 1. Advance the market (mid-price, reference spread)
//! 2. Market makers start the step and refresh client tiers
//! 3. Investors, in id order, fire requests; best quote wins
//! 4. Hedging round in market maker id order
//! 5. Delayed position revenue matures
//! 6. Risk cost on last step's inventory
//! 7. Rewards are finalised and a [`StepRecord`] is pushed
//!
//! Runs are deterministic for a given config and seed.

use super::config::{SimulationConfig, TieBreak};
use super::step_log::{
    MarketMakerSnapshot, PendingDisposition, SimulationLog, StepRecord, UnmaturedRevenue,
};
use crate::application::agents::{
    ExchangeVenue, HedgeVenue, Investor, MarketMaker, TradeRequest,
};
use crate::domain::MarketState;
use crate::error::{ConfigError, Result, SimulationError};
use crate::infrastructure::{MarketProcess, RandomStreams, StreamRole};
use dealer_core::{InvestorId, MarketMakerId, Participant, Trade, TradeId, TradeKind};
use log::{debug, info, warn};
use rand::prelude::*;

/// Relative tolerance under which two quotes count as equal
const QUOTE_TIE_TOLERANCE: f64 = 1e-12;

pub struct SimulationEngine {
    config: SimulationConfig,
    seed: u64,
    market: MarketProcess,
    investors: Vec<Investor>,
    market_makers: Vec<MarketMaker>,
    matching_rng: StdRng,
    next_trade_id: u64,
    records: Vec<StepRecord>,
    /// Step whose error left the engine unusable
    aborted_at: Option<u64>,
}

impl SimulationEngine {
    /// Build a run from `config`; `seed` replaces `config.seed`
    pub fn initialize(mut config: SimulationConfig, seed: u64) -> std::result::Result<Self, ConfigError> {
        config.seed = seed;
        config.validate()?;

        let streams = RandomStreams::new(seed);
        let market = MarketProcess::new(config.market.clone(), &streams)?;

        let investors = config
            .investors
            .iter()
            .enumerate()
            .map(|(i, investor)| Investor::new(InvestorId(i as u32), *investor, &streams))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let market_makers = config
            .market_makers
            .iter()
            .enumerate()
            .map(|(i, mm)| {
                MarketMaker::new(
                    MarketMakerId(i as u32),
                    mm.clone(),
                    config.num_tiers,
                    config.yield_ema_weight,
                    config.revenue_delay,
                    config.interdealer_tier,
                )
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!(
            "Simulation initialised: seed={}, steps={}, market makers={}, investors={}, tiers={}",
            seed,
            config.num_steps,
            market_makers.len(),
            investors.len(),
            config.num_tiers
        );

        Ok(Self {
            seed,
            market,
            investors,
            market_makers,
            matching_rng: streams.stream(StreamRole::Matching, 0),
            next_trade_id: 1,
            records: Vec::new(),
            aborted_at: None,
            config,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Steps completed so far
    pub fn current_step(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn is_finished(&self) -> bool {
        self.current_step() >= self.config.num_steps
    }

    /// Step that failed, if any; later calls to `step` return
    /// [`SimulationError::Aborted`]
    pub fn aborted_at(&self) -> Option<u64> {
        self.aborted_at
    }

    pub fn market_state(&self) -> MarketState {
        self.market.state()
    }

    pub fn investors(&self) -> &[Investor] {
        &self.investors
    }

    pub fn market_makers(&self) -> &[MarketMaker] {
        &self.market_makers
    }

    pub fn market_maker(&self, id: MarketMakerId) -> Option<&MarketMaker> {
        self.market_makers.get(id.index())
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Pin an investor's tier at one market maker until released
    pub fn force_tier(&mut self, market_maker: MarketMakerId, investor: InvestorId, tier: usize) -> Result<()> {
        self.market_maker_mut(market_maker)?.pin_tier(investor, tier)
    }

    /// Undo [`force_tier`](Self::force_tier); returns the pinned tier
    pub fn release_tier(&mut self, market_maker: MarketMakerId, investor: InvestorId) -> Result<Option<usize>> {
        Ok(self.market_maker_mut(market_maker)?.unpin_tier(investor))
    }

    fn market_maker_mut(&mut self, id: MarketMakerId) -> Result<&mut MarketMaker> {
        self.market_makers
            .get_mut(id.index())
            .ok_or(SimulationError::UnknownMarketMaker(id))
    }

    // =========================================================================
    // Running
    // =========================================================================

    /// Run up to `num_steps` more steps, stopping early at the end of the run
    pub fn run(&mut self, num_steps: u64) -> Result<&[StepRecord]> {
        let start = self.records.len();
        for _ in 0..num_steps {
            if self.is_finished() {
                break;
            }
            self.step()?;
        }
        Ok(&self.records[start..])
    }

    /// Run every remaining step
    pub fn run_to_completion(&mut self) -> Result<&[StepRecord]> {
        let remaining = self.config.num_steps.saturating_sub(self.current_step());
        self.run(remaining)
    }

    /// Run a single step
    ///
    /// An error part-way through a step aborts the engine: every later
    /// `step` fails and [`finish`](Self::finish) returns the steps completed
    /// before the failure.
    pub fn step(&mut self) -> Result<&StepRecord> {
        if let Some(step) = self.aborted_at {
            return Err(SimulationError::Aborted { step });
        }
        if self.is_finished() {
            return Err(SimulationError::Finished {
                steps: self.current_step(),
            });
        }

        if let Err(err) = self.advance_step() {
            let step = self.current_step() + 1;
            warn!("Step {} failed, aborting run: {}", step, err);
            self.aborted_at = Some(step);
            return Err(err);
        }

        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    fn advance_step(&mut self) -> Result<()> {
        // 1. Market
        let market = self.market.advance();
        let step = market.step;

        // 2. Tiers are frozen for the rest of the step
        for mm in &mut self.market_makers {
            mm.begin_step();
            mm.refresh_tiers();
        }

        let mut trades = Vec::new();

        // 3. Client flow
        let look_ahead = self.config.revenue_delay.max(1) as usize;
        for i in 0..self.investors.len() {
            let process = &mut self.market;
            let mid = market.mid_price;
            let Some(request) = self.investors[i].draw_request(|| process.future_mid(look_ahead) - mid)
            else {
                continue;
            };

            let trade = self.execute_client(&market, &request)?;
            trades.push(trade);
        }

        // 4. Hedging
        for idx in 0..self.market_makers.len() {
            if let Some(trade) = self.execute_hedge(&market, idx)? {
                trades.push(trade);
            }
        }

        // 5-7. Delayed revenue, risk, finalise
        let mut snapshots = Vec::with_capacity(self.market_makers.len());
        for mm in &mut self.market_makers {
            mm.realize_positions(step, market.mid_price);
            mm.assess_risk(market.mid_price, market.previous_mid);
            let rewards = mm.end_step();

            let tiers = self
                .investors
                .iter()
                .map(|investor| (investor.id(), mm.tier_of(investor.id())))
                .collect();
            snapshots.push(MarketMakerSnapshot {
                id: mm.id(),
                inventory: mm.inventory(),
                rewards,
                cumulative: mm.cumulative_rewards(),
                client_volume: mm.client_volume(),
                tiers,
            });
        }

        debug!(
            "Step {}: mid={:.4}, s0={:.3e}, client trades={}, hedges={}, inventories={:?}",
            step,
            market.mid_price,
            market.reference_spread(),
            trades.iter().filter(|t| t.is_client()).count(),
            trades.iter().filter(|t| t.is_hedge()).count(),
            snapshots.iter().map(|s| s.inventory).collect::<Vec<_>>()
        );

        self.records.push(StepRecord {
            step,
            mid_price: market.mid_price,
            reference_spread: market.reference_spread(),
            trades,
            market_makers: snapshots,
        });
        Ok(())
    }

    /// End the run; pending position revenue is discarded
    pub fn finish(mut self) -> SimulationLog {
        if let Some(step) = self.aborted_at {
            warn!("Finishing run aborted at step {}", step);
        }

        let mut unmatured = Vec::with_capacity(self.market_makers.len());
        for mm in &mut self.market_makers {
            let entries = mm.drain_unmatured();
            let net_volume: f64 = entries.iter().map(|e| e.signed_volume).sum();
            if !entries.is_empty() {
                warn!(
                    "{} discards {} pending revenue entries (net volume {:.4})",
                    mm.id(),
                    entries.len(),
                    net_volume
                );
            }
            unmatured.push(UnmaturedRevenue {
                market_maker: mm.id(),
                entries: entries.len(),
                net_volume,
            });
        }

        info!(
            "Simulation finished: seed={}, steps={}, trades={}",
            self.seed,
            self.records.len(),
            self.next_trade_id - 1
        );

        SimulationLog {
            seed: self.seed,
            records: self.records,
            pending_disposition: PendingDisposition::Discarded,
            unmatured,
        }
    }

    // =========================================================================
    // Matching
    // =========================================================================

    fn next_trade_id(&mut self) -> TradeId {
        let id = TradeId(self.next_trade_id);
        self.next_trade_id += 1;
        id
    }

    fn execute_client(&mut self, market: &MarketState, request: &TradeRequest) -> Result<Trade> {
        let quotes = self
            .market_makers
            .iter()
            .map(|mm| mm.quote(market, request.investor, request.volume))
            .collect::<Result<Vec<f64>>>()?;

        let winner = select_best(&quotes, self.config.tie_break, &mut self.matching_rng);
        let trade = Trade::new(
            self.next_trade_id(),
            market.step,
            TradeKind::Client,
            Participant::Investor(request.investor),
            Participant::Dealer(self.market_makers[winner].id()),
            request.side,
            request.volume,
            quotes[winner],
            market.mid_price,
        );
        self.market_makers[winner].apply_trade(&trade);
        Ok(trade)
    }

    fn execute_hedge(&mut self, market: &MarketState, idx: usize) -> Result<Option<Trade>> {
        let order = {
            let hedger = &self.market_makers[idx];
            let venues: Vec<&dyn HedgeVenue> = if self.market_makers.len() > 1 {
                self.market_makers
                    .iter()
                    .filter(|mm| mm.id() != hedger.id())
                    .map(|mm| mm as &dyn HedgeVenue)
                    .collect()
            } else {
                vec![&ExchangeVenue as &dyn HedgeVenue]
            };
            hedger.compute_hedge(market, &venues)?
        };
        let Some(order) = order else {
            return Ok(None);
        };

        let trade = Trade::new(
            self.next_trade_id(),
            market.step,
            TradeKind::Hedge,
            Participant::Dealer(self.market_makers[idx].id()),
            order.venue,
            order.side,
            order.volume,
            order.spread,
            market.mid_price,
        );
        self.market_makers[idx].apply_trade(&trade);
        if let Some(venue) = order.venue.dealer() {
            self.market_maker_mut(venue)?.apply_trade(&trade);
        }
        Ok(Some(trade))
    }
}

/// Index of the lowest quote; near-equal quotes are resolved per `tie_break`
fn select_best(quotes: &[f64], tie_break: TieBreak, rng: &mut StdRng) -> usize {
    let best = quotes.iter().copied().fold(f64::INFINITY, f64::min);
    let tolerance = best.abs() * QUOTE_TIE_TOLERANCE;
    let tied: Vec<usize> = quotes
        .iter()
        .enumerate()
        .filter(|(_, quote)| **quote <= best + tolerance)
        .map(|(i, _)| i)
        .collect();

    match (tie_break, tied.len()) {
        (_, 0) => 0,
        (_, 1) | (TieBreak::LowestId, _) => tied[0],
        (TieBreak::Random, n) => tied[rng.gen_range(0..n)],
    }
}
