//! Error types
//!
//! Configuration problems are fatal at initialisation and reported as
//! [`ConfigError`]. Everything that can go wrong while stepping is a
//! [`SimulationError`].

use dealer_core::MarketMakerId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("At least one market maker is required")]
    NoMarketMakers,

    #[error("At least one investor is required")]
    NoInvestors,

    #[error("Number of tiers must be at least 1")]
    ZeroTiers,

    #[error("{tiers} tiers exceed the number of investors ({investors})")]
    TierCountExceedsInvestors { tiers: usize, investors: usize },

    #[error("Volatility must be finite and non-negative, got {0}")]
    NegativeVolatility(f64),

    #[error("Liquidity shape must be finite and greater than 1, got {0}")]
    DegenerateLiquidityShape(f64),

    #[error("Invalid reference spread band: {0}")]
    InvalidSpreadBand(String),

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Pricing of {market_maker} can undercut the reference curve: {reason}")]
    ArbitrageUnsafePricing {
        market_maker: MarketMakerId,
        reason: String,
    },

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn check_probability(name: &'static str, value: f64) -> std::result::Result<(), Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::InvalidProbability { name, value })
        }
    }
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "Arbitrage violation by {market_maker}: quote {quote:.6e} below reference cost {reference:.6e} (volume {volume}, tier {tier})"
    )]
    ArbitrageViolation {
        market_maker: MarketMakerId,
        volume: f64,
        tier: usize,
        quote: f64,
        reference: f64,
    },

    #[error("Simulation already finished after {steps} steps")]
    Finished { steps: u64 },

    #[error("Simulation aborted by an error at step {step}")]
    Aborted { step: u64 },

    #[error("Unknown market maker: {0}")]
    UnknownMarketMaker(MarketMakerId),

    #[error("Tier {tier} out of range for {num_tiers} tiers")]
    InvalidTier { tier: usize, num_tiers: usize },

    #[error("Failed to serialize simulation log: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
