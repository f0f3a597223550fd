//! Shared domain types for the dealer-market simulation.
//!
//! Value objects (identifiers, sides), trade records and reward components
//! shared by the hedging engine and the agent-based simulation, plus the
//! small floating-point statistics the market makers keep per investor.

pub mod entities;
pub mod stats;
pub mod value_objects;

// Re-export value objects at crate root for convenience
pub use value_objects::{InvestorId, MarketMakerId, Participant, Side, TradeId};

// Re-export entities at crate root
pub use entities::{RewardComponents, Trade, TradeKind};

// Re-export stats at crate root
pub use stats::{Ema, RunningMean};
