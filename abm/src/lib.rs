//! Agent-Based Model (ABM) of a dealer market
//!
//! Market makers quote tiered spreads to price-taking investors under an
//! exogenous reference price, then hedge the resulting inventory by
//! trading with each other.
//!
//! # Example
//!
//! ```rust
//! use abm::{SimulationConfig, SimulationEngine};
//!
//! let config = SimulationConfig::reference(2, 5).with_steps(10);
//! let mut engine = SimulationEngine::initialize(config, 42).unwrap();
//! engine.run_to_completion().unwrap();
//!
//! let log = engine.finish();
//! assert_eq!(log.records.len(), 10);
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-export key types at crate root
pub use application::agents::{
    DefaultTier, DirectionStrategy, ExchangeVenue, HedgeOrder, HedgeVenue, Investor,
    InvestorConfig, MarketMaker, MarketMakerConfig, PricingPolicy, RankingMetric,
    SizeDistribution, SolverKind, TieringMode, TieringPolicy, TradeRequest,
};
pub use application::analysis::{
    RewardComponent, cumulative_series, internalization_series, market_share,
    market_share_by_investor,
};
pub use application::simulation::{
    MarketMakerSnapshot, PendingDisposition, SimulationConfig, SimulationEngine, SimulationLog,
    StepRecord, TieBreak, UnmaturedRevenue, replication_seeds, run_replications,
};
pub use domain::{LiquidityShape, MarketState, PendingRevenue, ReferenceCurve, RewardLedger, YieldRecord};
pub use error::{ConfigError, Result, SimulationError};
pub use infrastructure::{MarketConfig, MarketProcess, RandomStreams, StreamRole, VolatilityRegime};
