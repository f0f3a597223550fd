//! Agents
//!
//! - **Investor**: price taker; fires trade requests at the best quote
//! - **MarketMaker**: dealer quoting tiered spreads and hedging inventory
//!   with competing dealers

pub mod investor;
pub mod market_maker;

pub use investor::{DirectionStrategy, Investor, InvestorConfig, SizeDistribution, TradeRequest};
pub use market_maker::{
    DefaultTier, ExchangeVenue, HedgeOrder, HedgeVenue, MarketMaker, MarketMakerConfig,
    PricingPolicy, RankingMetric, SolverKind, TieringMode, TieringPolicy,
};
